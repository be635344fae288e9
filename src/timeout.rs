//! Search budgets for the nested scans.
//!
//! The symbol-table scan and the load-address correlation are CPU-bound
//! loops over untrusted input. A budget bounds them by wall-clock time;
//! running out surfaces as [`VxHunterError::SearchExhausted`], which is
//! distinct from "not found".

use crate::error::{Result, VxHunterError};
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// How many iterations pass between two clock reads
pub const DEFAULT_CHECK_INTERVAL: usize = 1024;

/// Wall-clock deadline shared by parallel workers.
///
/// `Copy + Sync`, so rayon closures can capture it by value.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// A deadline that never expires
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            limit: None,
        }
    }

    pub fn from_millis(ms: Option<u64>) -> Self {
        Self {
            start: Instant::now(),
            limit: ms.map(Duration::from_millis),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.limit.is_some()
    }

    pub fn expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.start.elapsed() > limit,
            None => false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Error value for an expired deadline
    pub fn exhausted(&self, operation: &str, iterations: usize) -> VxHunterError {
        VxHunterError::SearchExhausted {
            operation: operation.to_string(),
            iterations,
            elapsed_ms: self.start.elapsed().as_millis() as u64,
        }
    }

    /// Start a sequential iteration counter against this deadline
    pub fn iterations(&self, operation: impl Into<String>) -> IterationTimeout {
        IterationTimeout {
            deadline: *self,
            check_interval: DEFAULT_CHECK_INTERVAL,
            iteration_count: 0,
            operation_name: operation.into(),
        }
    }
}

/// Synchronous timeout check for loop iterations
pub struct IterationTimeout {
    deadline: Deadline,
    check_interval: usize,
    iteration_count: usize,
    operation_name: String,
}

impl IterationTimeout {
    /// Set the check interval (how often to read the clock)
    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Count one iteration; fails once the deadline has passed.
    pub fn check(&mut self) -> Result<()> {
        self.iteration_count += 1;

        if !self.deadline.is_bounded() || self.iteration_count % self.check_interval != 0 {
            return Ok(());
        }

        if self.deadline.expired() {
            error!(
                operation = %self.operation_name,
                iterations = self.iteration_count,
                elapsed = ?self.deadline.elapsed(),
                "search budget exhausted"
            );
            return Err(self
                .deadline
                .exhausted(&self.operation_name, self.iteration_count));
        }

        if self.deadline.elapsed().as_secs() > 30
            && self.iteration_count % (self.check_interval * 64) == 0
        {
            warn!(
                "Operation '{}' still running after {} iterations ({:?})",
                self.operation_name,
                self.iteration_count,
                self.deadline.elapsed()
            );
        }

        Ok(())
    }

    /// Get the number of iterations processed
    pub fn iterations(&self) -> usize {
        self.iteration_count
    }
}

/// Macro for adding budget checks to loops
#[macro_export]
macro_rules! check_timeout {
    ($timeout:expr) => {
        $timeout.check()?
    };
}
