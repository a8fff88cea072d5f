pub mod cycle;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use cycle::{run_cycle, CycleOutcome};
pub use scheduler::{run_logged, run_scheduled, run_until};
