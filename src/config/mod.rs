//! Configuration modules.
//!
//! Each submodule owns one configuration concern, loaded from environment
//! variables via a `from_env` constructor so state can also be assembled
//! explicitly in tests.
//!
//! - [`cors`]: allowed origins for the browser console
//! - [`database`]: PostgreSQL pool initialization and migrations
//! - [`jwt`]: bearer token verification settings

pub mod cors;
pub mod database;
pub mod jwt;
