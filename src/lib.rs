//! Exec Profile Studio
//!
//! Parsing, aggregation, call-tree reconstruction and comparison for
//! execution profile traces.
//!
//! This crate provides the core implementation for the
//! `exec-profile` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! exec-profile analyze --file session.prof --output session.json --summary
//! exec-profile compare --baseline before.prof --target after.prof
//! ```
//!
//! Library users go through [`parser::read_profile_trace`] then
//! [`aggregator::analyze_profile`].

pub mod aggregator;
pub mod calltree;
pub mod commands;
pub mod diff;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod utils;
