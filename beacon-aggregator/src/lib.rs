//! Multi-upstream beacon-client aggregator.
//!
//! Fronts a fleet of Ethereum consensus-layer ("beacon") nodes behind a single
//! client-facing surface: fan-out reads with last-success affinity, a concurrent
//! sync-status reduction, a first-success publish race, and unordered SSE fan-in. See
//! `SPEC_FULL.md` for the full module map.
//!
//! This crate does not implement an upstream itself — see [`upstream::Upstream`] for the
//! contract a caller must provide.

mod aggregator;
pub mod config;
mod dispatch;
pub mod error;
pub mod logging;
pub mod types;
pub mod upstream;

#[cfg(test)]
mod test_support;

pub use aggregator::Aggregator;
pub use error::Error;
pub use upstream::Upstream;
