//! Thread-local recursion fallback slot.
//!
//! When a `State`'s own expression reads `this`, it must not re-enter `function` (infinite
//! recursion); instead it needs to fall back to the *previous* function one level up
//! `previousStack`. This module holds that "currently active previous function," keyed by the
//! owning node's [`NodeId`] and type-erased so this crate does not need to know the concrete
//! expression type.
//!
//! `previousStack` itself (the actual linked list of prior functions) is owned by the `State`, not
//! by this module; this slot only ever holds a clone of a pointer into that list for the duration
//! of one evaluation.

use std::{any::Any, cell::RefCell, collections::HashMap};

use crate::NodeId;

thread_local! {
	static SLOTS: RefCell<HashMap<NodeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Removes and returns the value currently installed for `node`, if any.
///
/// This is the "pop" step of §4.4: the caller is expected to re-[`install`] whatever should take
/// its place (the popped node's own `previous` link) before it is done evaluating.
pub fn take(node: NodeId) -> Option<Box<dyn Any>> {
	SLOTS.with(|slots| slots.borrow_mut().remove(&node))
}

/// Installs `value` as the active recursion slot for `node`, returning a guard that restores
/// whatever was installed before on drop — guaranteed, including across a panicking evaluation.
#[must_use]
pub fn install(node: NodeId, value: Box<dyn Any>) -> InstallGuard {
	let previous = SLOTS.with(|slots| slots.borrow_mut().insert(node, value));
	InstallGuard {
		node,
		previous: Some(previous),
	}
}

/// Overwrites the active recursion slot for `node` with `value`, without tracking what was there
/// before.
///
/// Unlike [`install`], this is not paired with a restore: §4.4's read procedure pops one level of
/// `previousStack` at a time as `this` is read repeatedly within the same evaluation, and each pop
/// is meant to stick for the rest of that evaluation rather than unwind when the read returns.
pub fn set(node: NodeId, value: Box<dyn Any>) {
	SLOTS.with(|slots| {
		slots.borrow_mut().insert(node, value);
	});
}

pub struct InstallGuard {
	node: NodeId,
	// Outer Option distinguishes "already restored" from "nothing was here before" (inner None).
	previous: Option<Option<Box<dyn Any>>>,
}

impl Drop for InstallGuard {
	fn drop(&mut self) {
		let Some(previous) = self.previous.take() else {
			return;
		};
		SLOTS.with(|slots| {
			let mut slots = slots.borrow_mut();
			match previous {
				Some(value) => {
					slots.insert(self.node, value);
				}
				None => {
					slots.remove(&self.node);
				}
			}
		});
	}
}
