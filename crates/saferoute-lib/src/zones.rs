//! Danger zones and the classifier that decides whether a coordinate is at risk.
//!
//! Classification defaults to bounding-box containment: a coordinate is in
//! danger when it lies inside the axis-aligned box spanned by any zone's
//! polygon. [`ZoneContainment::Polygon`] switches to exact ray-casting
//! containment, which penalizes fewer edges than the bounding-box default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Minimum number of vertices a zone polygon must have.
pub const MIN_ZONE_VERTICES: usize = 3;

/// Geofenced polygon marking an area of elevated risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerZone {
    pub id: String,
    pub name: String,
    pub polygon: Vec<Coordinate>,
    /// Risk level from 1 to 10. Carried for display; the cost model only
    /// looks at containment.
    pub risk_level: u8,
    #[serde(default)]
    pub description: String,
}

impl DangerZone {
    /// Validate the polygon and risk level of this zone.
    pub fn validate(&self) -> Result<()> {
        if self.polygon.len() < MIN_ZONE_VERTICES {
            return Err(Error::MalformedZone {
                id: self.id.clone(),
                reason: format!(
                    "polygon has {} vertices, at least {} required",
                    self.polygon.len(),
                    MIN_ZONE_VERTICES
                ),
            });
        }
        if !(1..=10).contains(&self.risk_level) {
            return Err(Error::MalformedZone {
                id: self.id.clone(),
                reason: format!("risk level {} is outside 1-10", self.risk_level),
            });
        }
        for vertex in &self.polygon {
            vertex.validate()?;
        }
        Ok(())
    }

    /// Axis-aligned bounding box of the polygon, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::around(&self.polygon)
    }

    /// Exact point-in-polygon test using ray casting.
    pub fn polygon_contains(&self, point: &Coordinate) -> bool {
        let n = self.polygon.len();
        if n < MIN_ZONE_VERTICES {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (yi, xi) = (self.polygon[i].lat, self.polygon[i].lng);
            let (yj, xj) = (self.polygon[j].lat, self.polygon[j].lng);
            if ((yi > point.lat) != (yj > point.lat))
                && (point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Inclusive latitude/longitude bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` when `points` is empty.
    pub fn around(points: &[Coordinate]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for p in rest {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.max_lng = bbox.max_lng.max(p.lng);
        }
        Some(bbox)
    }

    /// Whether the point lies inside or on the edge of the box.
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

/// Containment strategy used when classifying coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneContainment {
    /// Inside the polygon's axis-aligned bounding box.
    #[default]
    BoundingBox,
    /// Inside the polygon itself (ray casting).
    Polygon,
}

/// Classifier over a fixed set of validated danger zones.
#[derive(Debug, Clone, Default)]
pub struct ZoneClassifier {
    zones: Vec<DangerZone>,
    boxes: Vec<BoundingBox>,
    containment: ZoneContainment,
}

impl ZoneClassifier {
    /// Validate `zones` and precompute their bounding boxes.
    pub fn new(zones: Vec<DangerZone>, containment: ZoneContainment) -> Result<Self> {
        let mut boxes = Vec::with_capacity(zones.len());
        for zone in &zones {
            zone.validate()?;
            let Some(bbox) = zone.bounding_box() else {
                return Err(Error::MalformedZone {
                    id: zone.id.clone(),
                    reason: "polygon is empty".to_string(),
                });
            };
            boxes.push(bbox);
        }
        Ok(Self {
            zones,
            boxes,
            containment,
        })
    }

    pub fn containment(&self) -> ZoneContainment {
        self.containment
    }

    pub fn zones(&self) -> &[DangerZone] {
        &self.zones
    }

    /// Whether `point` falls inside any zone.
    pub fn is_in_danger(&self, point: &Coordinate) -> bool {
        self.zones_containing(point).next().is_some()
    }

    /// Zones whose area contains `point`, in declaration order.
    pub fn zones_containing<'a>(
        &'a self,
        point: &'a Coordinate,
    ) -> impl Iterator<Item = &'a DangerZone> + 'a {
        self.zones
            .iter()
            .zip(self.boxes.iter())
            .filter(move |(zone, bbox)| match self.containment {
                ZoneContainment::BoundingBox => bbox.contains(point),
                ZoneContainment::Polygon => bbox.contains(point) && zone.polygon_contains(point),
            })
            .map(|(zone, _)| zone)
    }
}

/// Bounding-box classification of a single coordinate against `zones`.
///
/// Agrees with a [`ZoneClassifier`] in [`ZoneContainment::BoundingBox`] mode
/// built from the same zones. Zones with an empty polygon never match.
pub fn is_in_zone(point: &Coordinate, zones: &[DangerZone]) -> bool {
    zones
        .iter()
        .filter_map(DangerZone::bounding_box)
        .any(|bbox| bbox.contains(point))
}
