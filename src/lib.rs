//! Library exports for moketravel, shared between the binary and tests.

pub mod config;
pub mod context;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
