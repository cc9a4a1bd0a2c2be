// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running the sentinel.
//!
//! This module contains the command-line interface logic, including argument parsing
//! and the `run` command implementation.

pub mod args;
pub mod logging;
pub mod run;
