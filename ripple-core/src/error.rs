use crate::NodeId;

/// Errors surfaced by the dependency-tracking runtime.
///
/// Most of the public `ripple` API is infallible by design (a write just fires); these variants
/// cover the handful of operations that can genuinely fail without indicating a bug in the crate
/// itself, plus the aggregated panic reports from [`fire`](crate::Invocation).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReactiveError {
	/// A dependency was referenced outside of any [`DependencyContext::push`](crate::DependencyContext::push) scope.
	///
	/// `DependencyContext::reference` itself is a no-op rather than fallible here (an incidental read
	/// outside any evaluation is routine, not an error); this variant exists for the error enum's own
	/// completeness and for future internal accessors that do need to distinguish the two cases.
	#[error("no dependency context is installed on this thread")]
	NoContext,

	/// A self-referential expression read `this` deeper than its previous-function stack goes.
	#[error("recursive read of node {node:?} exceeded its previous-function stack (depth {depth})")]
	RecursionExhausted { node: NodeId, depth: usize },

	/// A listener or expression body panicked during a `fire`.
	#[error("listener {listener:?} on node {node:?} panicked")]
	UserPanic { node: NodeId, listener: NodeId },
}
