use ripple_core::ReactiveError;

use crate::observable::Observable;

/// A write-only endpoint: fires values to its listeners but never caches or re-derives one.
///
/// Unlike [`State`](crate::State), nothing reads a `Channel` as a dependency — there is no value
/// to read, only events to send. Use a `Channel` for one-off occurrences (clicks, ticks, log
/// lines); use a [`StateChannel`](crate::StateChannel) when the latest value itself matters.
pub struct Channel<T> {
	observable: Observable<T>,
}

impl<T> Clone for Channel<T> {
	fn clone(&self) -> Self {
		Self {
			observable: self.observable.clone(),
		}
	}
}

impl<T: 'static> Default for Channel<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> Channel<T> {
	#[must_use]
	pub fn new() -> Self {
		Self {
			observable: Observable::new(),
		}
	}

	/// Fires `value` to every currently attached listener.
	pub fn send(&self, value: T) -> Vec<ReactiveError> {
		self.observable.fire(value)
	}
}

impl<T> std::ops::Deref for Channel<T> {
	type Target = Observable<T>;

	fn deref(&self) -> &Observable<T> {
		&self.observable
	}
}
