//! Vendor bid evaluation workflows for procurement automation.
//!
//! The library is organized the same way the service consumes it: `config`
//! and `telemetry` bootstrap the process, `error` carries the top-level
//! application error, and `workflows` holds the sourcing-event evaluation
//! domain (scoring matrix, completion gating, winner-selection approvals).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
