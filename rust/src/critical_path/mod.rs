//! Critical path estimation.
//!
//! A forward pass gives each task its dependency-adjusted earliest start and
//! finish; a backward pass from the project makespan gives latest start and
//! finish, and from those the slack. The earliest start, not the declared
//! window start, is the bound the allocator schedules against.

mod calculation;
mod types;

pub use calculation::{calculate_critical_path, max_overlap, CriticalPathResult};
pub use types::TaskTiming;
