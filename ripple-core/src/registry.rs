//! Process-wide, type-erased registry of reactive nodes.
//!
//! A `State` depends on other nodes without knowing their value type: its dependency set is just
//! [`NodeId`]s (captured via [`crate::DependencyContext`]). To actually attach or detach its
//! monitor on a dependency, it looks the concrete node back up here as a [`Attachable`] trait
//! object. Entries are [`Weak`], so a node that is otherwise unreachable can still be dropped; a
//! dependent holding a stale id simply finds nothing to attach to.

use std::{
	collections::HashMap,
	sync::{Arc, RwLock, Weak},
};

use once_cell::sync::Lazy;

use crate::{ListenerHandle, NodeId};

/// A node that can have a value-erased "monitor" callback attached to or detached from it.
///
/// Implemented by `Observable<T>` for every `T`; this is how `State::replace` rewires its
/// dependency edges without needing to know what any of its dependencies actually produce.
pub trait Attachable: Send + Sync {
	fn id(&self) -> NodeId;

	/// Attaches `body`, to be called (ignoring the fired value) on every future fire.
	fn attach_monitor(&self, body: Arc<dyn Fn() + Send + Sync>) -> ListenerHandle;

	fn detach_monitor(&self, handle: ListenerHandle);
}

static REGISTRY: Lazy<RwLock<HashMap<NodeId, Weak<dyn Attachable>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `node` so other nodes can later find it by id alone.
pub fn register(node: Weak<dyn Attachable>, id: NodeId) {
	REGISTRY.write().unwrap().insert(id, node);
}

/// Looks up a previously [`register`]ed node, if it is both still registered and still alive.
#[must_use]
pub fn lookup(id: NodeId) -> Option<Arc<dyn Attachable>> {
	REGISTRY.read().unwrap().get(&id).and_then(Weak::upgrade)
}

/// Drops the registry entry for `id`. Idempotent.
pub fn unregister(id: NodeId) {
	REGISTRY.write().unwrap().remove(&id);
}
