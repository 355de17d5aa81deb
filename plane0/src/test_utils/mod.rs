//! Mock collaborators for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the trait APIs are usable and give control
//! plane tests call-count visibility into every boundary.

mod counting_rules;
mod executors;

pub use counting_rules::CountingRules;
pub use executors::{CountingExecutor, FailingExecutor, RecordingExecutor, StaticExecutor};
