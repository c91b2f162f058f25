//! Contracts between media nodes and the pull-based scheduler that drives
//! them.

pub mod reconfigurable;
pub mod sink;
pub mod transformer;
