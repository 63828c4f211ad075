use std::sync::atomic::{AtomicBool, Ordering};

/// Per-`fire` control token.
///
/// Passed to every listener invoked during a single [`fire`](crate::Invocation), it lets a
/// listener halt delivery to the listeners that would otherwise still run for that same fire.
/// Not shared across fires: each `fire` call gets a fresh (or freshly [`reset`](Invocation::reset))
/// token.
#[derive(Debug, Default)]
pub struct Invocation {
	stopped: AtomicBool,
}

impl Invocation {
	#[must_use]
	pub fn new() -> Self {
		Self {
			stopped: AtomicBool::new(false),
		}
	}

	/// Halts delivery to the remaining listeners of the fire this token belongs to.
	pub fn stop(&self) {
		self.stopped.store(true, Ordering::Release);
	}

	#[must_use]
	pub fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::Acquire)
	}

	/// Returns the token to the unstopped state so it can be reused for another fire.
	pub fn reset(&self) {
		self.stopped.store(false, Ordering::Release);
	}
}
