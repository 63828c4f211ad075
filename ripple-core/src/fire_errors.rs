//! Thread-local sink for errors raised by a `fire` nested inside another `fire`.
//!
//! A `State`'s monitor runs synchronously inside its dependency's `fire` loop and has no return
//! value to hand errors back through (the [`Attachable`](crate::Attachable) monitor signature is a
//! bare `Fn()`), so a panic several recomputations downstream would otherwise be swallowed before
//! it reaches the `fire` call the caller actually made. This sink lets only the outermost `fire` on
//! a thread collect everything any nested `fire` it (transitively) caused also recorded, so it can
//! fold those into its own returned `Vec`.

use std::cell::RefCell;

use crate::ReactiveError;

thread_local! {
	static SINK: RefCell<Option<Vec<ReactiveError>>> = const { RefCell::new(None) };
}

/// Marks the start of a `fire` call for the purposes of transitive error collection.
pub struct FireErrorsScope {
	owns: bool,
}

impl FireErrorsScope {
	/// Call at the start of every `fire`. Installs a fresh sink if none is active yet on this
	/// thread (this `fire` is the outermost one in its call chain); otherwise joins the one already
	/// installed by an enclosing `fire`.
	#[must_use]
	pub fn enter() -> Self {
		let owns = SINK.with(|sink| {
			let mut sink = sink.borrow_mut();
			if sink.is_none() {
				*sink = Some(Vec::new());
				true
			} else {
				false
			}
		});
		Self { owns }
	}

	#[must_use]
	pub fn owns(&self) -> bool {
		self.owns
	}

	/// Drains the sink if this scope installed it, returning everything recorded by nested `fire`
	/// calls while it was active. A nested scope (one that joined rather than installed the sink)
	/// returns `None`; its contribution stays in the sink for the outermost scope to collect.
	#[must_use]
	pub fn finish(self) -> Option<Vec<ReactiveError>> {
		if !self.owns {
			return None;
		}
		SINK.with(|sink| sink.borrow_mut().take())
	}
}

/// Records `error` for the outermost `fire` on this thread to collect. No-op if no `fire` is
/// currently active on this thread (should not happen in practice, since every `fire` enters a
/// scope before running any listener).
pub fn record(error: ReactiveError) {
	SINK.with(|sink| {
		if let Some(errors) = sink.borrow_mut().as_mut() {
			errors.push(error);
		}
	});
}
