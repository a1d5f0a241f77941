//! Request-side glue: when to swap a response for a profiling report.

pub mod gate;

pub use gate::{ProfileGate, ProfileResponse, RequestContext};
