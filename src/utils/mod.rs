//! Shared utilities.
//!
//! - [`datetime`]: date-range query parameter parsing
//! - [`errors`]: application error taxonomy and response mapping
//! - [`jwt`]: bearer token creation and verification
//! - [`pagination`]: cursor pagination parameters and metadata
//! - [`response`]: common response envelopes

pub mod datetime;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod response;
