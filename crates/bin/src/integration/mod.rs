//! Glue between the command line and the navtrack crates.
//!
//! `config_manager` resolves the configuration file, `data_pipeline` runs the
//! fetch and series stages, and `render` lays the results out on the
//! dashboard page.

pub(crate) mod config_manager;
pub(crate) mod data_pipeline;
pub(crate) mod render;
