use std::{
	num::NonZeroU64,
	sync::atomic::{AtomicU64, Ordering},
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a reactive node (an `Observable`, `State`, `Channel`, ...) for dependency tracking
/// and listener-identity purposes.
///
/// Symbols are never reused within a process, even after the node they named is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU64);

impl NodeId {
	#[must_use]
	pub fn next() -> Self {
		let raw = NEXT_ID.fetch_add(1, Ordering::Relaxed);
		Self(NonZeroU64::new(raw).expect("node id counter overflowed or wrapped to zero"))
	}
}

/// Handle identifying an attached listener (or dependency monitor) by identity rather than by the
/// behavior of the closure it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub NodeId);

impl ListenerHandle {
	#[must_use]
	pub fn next() -> Self {
		Self(NodeId::next())
	}
}
