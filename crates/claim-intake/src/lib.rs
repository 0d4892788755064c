//! Accident-claim intake and case triage.
//!
//! [`triage`] holds the scoring rules that turn raw intake answers into a viability score,
//! a case state and a priority. [`cases`] wraps those rules in the intake service, the
//! repository seam and the HTTP router used by the staff dashboard.

pub mod cases;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod triage;
