//! Command-line front end for the Greek tax engine.
//!
//! The `greek-tax` binary is a thin clap layer over [`app`]; everything it
//! prints comes from [`report`].

pub mod app;
pub mod config;
pub mod input_file;
pub mod logging;
pub mod report;
pub mod utils;
