//! Shared plumbing for the POI proposer binaries.

pub mod logging;
