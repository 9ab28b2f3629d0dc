//! Delivery records dashboard.
//!
//! [`data`] holds the pipeline (load → clean → type → filter → aggregate);
//! everything else is the egui front end that renders its outputs.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
