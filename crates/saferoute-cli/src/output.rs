//! Output formatting for routes, nodes and danger zones.
//!
//! Text, rich and note views come straight from the library's renderer; the
//! remaining views are CLI-specific.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use saferoute_lib::{Advice, DangerZone, Graph, RouteRenderMode, RouteStep, RouteSummary};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Rich,
    Basic,
    Note,
    Enhanced,
    Json,
}

/// Route plus optional advice, as emitted in JSON format.
#[derive(Debug, Serialize)]
struct RouteOutput<'a> {
    #[serde(flatten)]
    route: &'a RouteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    advice: Option<&'a Advice>,
}

#[derive(Debug, Serialize)]
struct NodeListing<'a> {
    id: &'a str,
    label: &'a str,
    lat: f64,
    lng: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    zones: Vec<&'a str>,
}

impl OutputFormat {
    /// Print a route summary, followed by advice when present.
    pub fn render_route(self, summary: &RouteSummary, advice: Option<&Advice>) -> io::Result<()> {
        match self {
            OutputFormat::Text => print!("{}", summary.render(RouteRenderMode::PlainText)),
            OutputFormat::Rich => print!("{}", summary.render(RouteRenderMode::RichText)),
            OutputFormat::Note => print!("{}", summary.render(RouteRenderMode::Note)),
            OutputFormat::Basic => print!("{}", render_basic(summary)),
            OutputFormat::Enhanced => {
                let renderer = EnhancedRenderer::new(ColorPalette::detect());
                print!("{}", renderer.render(summary));
            }
            OutputFormat::Json => {
                return write_json(&RouteOutput {
                    route: summary,
                    advice,
                })
            }
        }
        if let Some(advice) = advice {
            print!("{}", render_advice(advice));
        }
        Ok(())
    }

    /// Print every node of the graph.
    pub fn render_nodes(self, graph: &Graph) -> io::Result<()> {
        let listings: Vec<NodeListing<'_>> = graph
            .nodes()
            .map(|node| NodeListing {
                id: &node.id,
                label: &node.label,
                lat: node.coordinate.lat,
                lng: node.coordinate.lng,
                zones: graph
                    .classifier()
                    .zones_containing(&node.coordinate)
                    .map(|zone| zone.name.as_str())
                    .collect(),
            })
            .collect();

        if self == OutputFormat::Json {
            return write_json(&listings);
        }
        for node in &listings {
            print!(
                "{:<6} {} ({:.4}, {:.4})",
                node.id, node.label, node.lat, node.lng
            );
            if !node.zones.is_empty() {
                print!(" [danger: {}]", node.zones.join(", "));
            }
            println!();
        }
        Ok(())
    }

    /// Print every danger zone of the graph.
    pub fn render_zones(self, zones: &[DangerZone]) -> io::Result<()> {
        if self == OutputFormat::Json {
            return write_json(&zones);
        }
        for zone in zones {
            println!(
                "{} {} (risk {}/10, {} vertices)",
                zone.id,
                zone.name,
                zone.risk_level,
                zone.polygon.len()
            );
            if !zone.description.is_empty() {
                println!("    {}", zone.description);
            }
        }
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Render a route in basic path format.
///
/// Uses `+`/`|`/`-` prefixes for first/middle/last steps.
pub fn render_basic(summary: &RouteSummary) -> String {
    let len = summary.steps.len();
    let mut out = String::new();
    for (i, step) in summary.steps.iter().enumerate() {
        let prefix = if i == 0 {
            '+'
        } else if i + 1 == len {
            '-'
        } else {
            '|'
        };
        out.push_str(&format!("{} {}\n", prefix, step.label));
    }
    out.push_str(&format!(
        "{:.0}m, average safety score {:.2}\n",
        summary.total_distance, summary.average_safety_score
    ));
    out
}

/// Render safety advice as an indented tip list.
pub fn render_advice(advice: &Advice) -> String {
    let mut out = format!("\nSafety advice: {}\n", advice.summary);
    for tip in &advice.tips {
        out.push_str(&format!("  * {}\n", tip));
    }
    out
}

const FOOTER_RULE: &str = "───────────────────────────────────────";

/// Renderer for the enhanced format with colored tags and danger markers.
pub struct EnhancedRenderer {
    palette: ColorPalette,
}

impl EnhancedRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn render(&self, summary: &RouteSummary) -> String {
        let p = &self.palette;
        let mut out = format!(
            "Route from {}{}{} to {}{}{} ({} segments, {}):\n",
            p.white_bold,
            summary.start.label,
            p.reset,
            p.white_bold,
            summary.goal.label,
            p.reset,
            summary.hops,
            summary.mode
        );

        let len = summary.steps.len();
        for (i, step) in summary.steps.iter().enumerate() {
            out.push_str(&self.render_step(step, i == 0, i + 1 == len));
        }
        out.push_str(&self.render_footer(summary));
        out
    }

    fn render_step(&self, step: &RouteStep, is_first: bool, is_last: bool) -> String {
        let p = &self.palette;
        let (tag_color, tag_text) = if is_first {
            (p.tag_start, " STRT ")
        } else if is_last {
            (p.tag_goal, " GOAL ")
        } else {
            (p.tag_walk, " WALK ")
        };
        let circle = if step.zones.is_empty() {
            "●".to_string()
        } else {
            format!("{}●{}", p.red, p.reset)
        };

        let mut line = format!(
            "{}{}{} {} {}{}{}",
            tag_color, tag_text, p.reset, circle, p.white_bold, step.label, p.reset
        );
        if let (Some(distance), Some(weight)) = (step.distance, step.safety_weight) {
            line.push_str(&format!(
                " ({}m, x{})",
                format_with_separators(distance.round() as u64),
                weight
            ));
        }
        line.push('\n');
        if !step.zones.is_empty() {
            line.push_str(&format!(
                "       {}│{} {}{}{}\n",
                p.gray,
                p.reset,
                p.red,
                step.zones.join(", "),
                p.reset
            ));
        }
        line
    }

    fn render_footer(&self, summary: &RouteSummary) -> String {
        let p = &self.palette;
        let risk = p.risk(summary.risk_level);
        let distance = format_with_separators(summary.total_distance.round() as u64);

        let mut out = format!("\n{}{}{}\n", p.gray, FOOTER_RULE, p.reset);
        out.push_str(&format!(
            "  Total Distance:  {}{}m{}\n",
            p.white_bold, distance, p.reset
        ));
        out.push_str(&format!(
            "  Safety Score:    {}{:.2} ({}){}\n",
            risk, summary.average_safety_score, summary.risk_level, p.reset
        ));
        out
    }
}
