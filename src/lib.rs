//! Catalog search proxy for Resonance jam sessions.
//!
//! The proxy holds one client-credentials bearer token for the catalog API,
//! refreshes it a minute before it expires, and forwards track searches.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod remote;
