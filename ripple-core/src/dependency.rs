//! Thread-local implicit dependency capture.
//!
//! A `State` records its dependencies by reading them normally; every such read calls
//! [`DependencyContext::reference`], which is a no-op unless an evaluation has installed a
//! capturing scope with [`DependencyContext::push`].

use std::{cell::RefCell, collections::HashSet};

use scopeguard::{guard, ScopeGuard};

use crate::NodeId;

thread_local! {
	static CURRENT: RefCell<Option<HashSet<NodeId>>> = const { RefCell::new(None) };
}

type RestoreFn = Box<dyn FnOnce(Option<HashSet<NodeId>>)>;

/// Implicit-read capture mechanism. Stateless; all state lives in the thread-local slot.
pub struct DependencyContext;

impl DependencyContext {
	/// Installs a fresh, empty capturing set, saving whatever was previously installed.
	///
	/// The returned [`ContextScope`] restores the previously-installed context when it is dropped —
	/// on the normal path via [`ContextScope::finish`], or on an unwinding panic via its `Drop` impl
	/// — so a context scope is never left dangling regardless of how evaluation exits.
	#[must_use]
	pub fn push() -> ContextScope {
		let previous = CURRENT.with(|c| c.replace(Some(HashSet::new())));
		ContextScope(Some(guard(
			previous,
			Box::new(|previous| {
				CURRENT.with(|c| {
					c.replace(previous);
				});
			}) as RestoreFn,
		)))
	}

	/// Records `id` as a dependency of the currently installed context, if any.
	pub fn reference(id: NodeId) {
		CURRENT.with(|c| {
			if let Some(set) = c.borrow_mut().as_mut() {
				set.insert(id);
			}
		});
	}

	/// Whether a capturing scope is currently installed on this thread.
	#[must_use]
	pub fn is_active() -> bool {
		CURRENT.with(|c| c.borrow().is_some())
	}
}

/// RAII handle returned by [`DependencyContext::push`].
pub struct ContextScope(Option<ScopeGuard<Option<HashSet<NodeId>>, RestoreFn>>);

impl ContextScope {
	/// Ends the scope, restoring the enclosing context and returning the set of node ids that were
	/// referenced while this scope was active.
	#[must_use]
	pub fn finish(mut self) -> HashSet<NodeId> {
		let guard = self.0.take().expect("ContextScope::finish called twice");
		// Defuses the guard's restore closure so we can do the restore ourselves and recover the
		// set that was installed in its place.
		let previous = ScopeGuard::into_inner(guard);
		CURRENT
			.with(|c| c.replace(previous))
			.expect("ContextScope was active but held no set")
	}
}
