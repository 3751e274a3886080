//! SafeRoute CLI library.
//!
//! Subcommand handlers, output formatting and terminal styling for the
//! `saferoute` binary.

pub mod commands;
pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
