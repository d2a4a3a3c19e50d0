//! Case allocation service library.
//!
//! Houses the allocation rule engine, the staff directory and decision
//! repository seams, the HTTP router for the allocation endpoints, and the
//! supporting configuration, telemetry, and roster-import plumbing.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
