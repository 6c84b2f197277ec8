//! `econ-graph` library crate.
//!
//! The binary (`econ`) is a thin wrapper around this library so that:
//!
//! - the fetch pipeline and update cycle are testable without a terminal
//! - the terminal UI is just one front-end over the same session state

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod logging;
pub mod session;
pub mod tui;
