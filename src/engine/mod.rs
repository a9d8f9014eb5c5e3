//! Grading engine module.
//!
//! Provides the per-run check context, check orchestration and result
//! aggregation.

pub mod context;
pub mod orchestrator;
pub mod result;
