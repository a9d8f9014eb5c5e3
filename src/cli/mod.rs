//! CLI module for argument parsing and output formatting.
//!
//! Argument definitions use clap's derive API; formatters render reports as
//! text, JSON or JUnit XML.

pub mod args;
pub mod output;
