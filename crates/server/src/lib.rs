//! Pantry server library.
//!
//! The HTTP API, the `PostgreSQL` store and the recipe generator adapter,
//! exposed as a library so the integration tests can drive the router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
