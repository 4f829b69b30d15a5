//! Library crate for hockey-viz, exposing modules for binaries and integration tests.

pub mod config;
pub mod dto;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod routes;
pub mod services;
pub mod state;
