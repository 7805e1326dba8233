//! Quorum arithmetic and per-request response bookkeeping shared by the
//! admission and oracle engines.

pub mod evaluator;
pub mod evidence;
pub mod registry;
