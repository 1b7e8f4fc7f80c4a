// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::FlowOutcome;

/// Thread-safe counters for refresh exchanges.
///
/// Mirrors the refresh labels of the `brokerage_auth_flow_total` counter and moves only
/// when an upstream exchange actually runs: a tick that reuses a valid access token or
/// finds the terminal state records nothing.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the total number of refresh exchanges attempted.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh exchanges that rotated and persisted a new pair.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed refresh exchanges.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record(&self, outcome: FlowOutcome) {
		let counter = match outcome {
			FlowOutcome::Attempt => &self.attempts,
			FlowOutcome::Success => &self.success,
			FlowOutcome::Failure => &self.failure,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}
