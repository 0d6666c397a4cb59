//! HTTP API for coevod

pub mod rest;

pub use rest::router::create_router;
