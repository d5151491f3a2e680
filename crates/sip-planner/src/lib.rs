//! SIP Planner
//!
//! Future-value projections for systematic investment plans.

pub mod projector;
pub mod schedule;

pub use projector::{project_sip, SipFrequency, SipPlan, SipProjection, MAX_DURATION_MONTHS};
pub use schedule::{growth_schedule, YearlyGrowth};
