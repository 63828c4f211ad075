use ripple_core::ReactiveError;

use crate::binding::{bind, BindSet, Binding};
use crate::state::State;

/// A [`State`] that can also be written to directly, rather than only recomputed from its
/// dependencies.
///
/// `StateChannel` is what user code usually reaches for: `Var(0)` for a plain mutable cell,
/// `send_expr` for turning it into a derived value later, `send_static` for an ordinary
/// assignment.
pub struct StateChannel<T> {
	state: State<T>,
}

/// Alias matching how a `StateChannel` is usually introduced: a named, assignable variable.
pub type Var<T> = StateChannel<T>;

impl<T> Clone for StateChannel<T> {
	fn clone(&self) -> Self {
		Self {
			state: self.state.clone(),
		}
	}
}

impl<T> std::ops::Deref for StateChannel<T> {
	type Target = State<T>;

	fn deref(&self) -> &State<T> {
		&self.state
	}
}

impl<T: Clone + PartialEq + Send + Sync + 'static> StateChannel<T> {
	/// Builds a `StateChannel` holding `initial`, re-firing whenever its value actually changes.
	#[must_use]
	pub fn new(initial: T) -> Self {
		Self {
			state: State::new(move || initial.clone(), true, true),
		}
	}

	/// Assigns `value` directly. The expression installed is a constant thunk, so this never
	/// re-evaluates anything and never captures a dependency.
	pub fn send_static(&self, value: T) -> Vec<ReactiveError> {
		self.state.replace(move || value.clone())
	}

	/// Installs `expr` as this node's expression, same as [`State::replace`].
	pub fn send_expr(&self, expr: impl Fn() -> T + Send + Sync + 'static) -> Vec<ReactiveError> {
		self.state.replace(expr)
	}

	/// Two-way binds this channel to `other`, keeping their values identical.
	///
	/// `set_now` decides which side's current value wins at bind time; after that, a write to
	/// either side propagates to the other, guarded against the write it was itself caused by.
	#[must_use]
	pub fn bind(&self, other: &StateChannel<T>, set_now: BindSet) -> Binding<T, T> {
		bind(self, other, |v: &T| v.clone(), |v: &T| v.clone(), set_now)
	}
}
