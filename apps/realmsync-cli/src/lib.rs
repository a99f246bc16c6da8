//! realmsync: reconcile an identity realm with a spreadsheet
//!
//! The binary in `main.rs` wires these modules together; they are exposed
//! here for integration testing.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod reconcile;
