use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
};

use parking_lot::Mutex as PLMutex;
use ripple_core::{registry, Attachable, DependencyContext, NodeId, ReactiveError};

use crate::listener::ListenerHandle;
use crate::observable::Observable;

type Expr<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// One link of the `previousStack`: a function this node's expression used to be, together with
/// whatever it could itself fall back to.
struct PrevNode<T> {
	function: Expr<T>,
	previous: Option<Arc<PrevNode<T>>>,
}

// `Arc<PrevNode<T>>` derives `Clone` fine, but `#[derive(Clone)]` would require `T: Clone`; write
// it by hand since cloning the node only clones the `Arc`s inside it.
impl<T> Clone for PrevNode<T> {
	fn clone(&self) -> Self {
		Self {
			function: self.function.clone(),
			previous: self.previous.clone(),
		}
	}
}

/// Everything a `replace`/recompute touches, behind one lock.
///
/// `function`, `previous_stack`, `cached_value`, and `dependencies` are kept in a single struct
/// rather than one lock each: §5 requires that a concurrent read see this node either fully before
/// or fully after a `replace`, and a reader taking the fields one lock at a time could otherwise
/// observe, say, the new (self-referential) `function` paired with the old `previous_stack`.
struct Inner<T> {
	function: Expr<T>,
	cached_value: T,
	dependencies: HashMap<NodeId, (Arc<dyn Attachable>, ListenerHandle)>,
	previous_stack: Option<Arc<PrevNode<T>>>,
}

struct Engine<T> {
	inner: PLMutex<Inner<T>>,
	distinct: bool,
	cache_enabled: bool,
}

/// A derived value that recomputes from an expression and re-fires when that expression's result
/// changes.
///
/// `State` is an [`Observable`] plus a cached expression: reading it ([`get`](Self::get)) returns
/// the cached value (or evaluates the expression, if caching is disabled or this is the first
/// read), and replacing its expression ([`replace`](Self::replace)) re-evaluates it, diffs the new
/// dependency set against the old one, and fires only if the result actually changed (when
/// `distinct` was requested).
pub struct State<T> {
	observable: Observable<T>,
	engine: Arc<Engine<T>>,
}

impl<T> Clone for State<T> {
	fn clone(&self) -> Self {
		Self {
			observable: self.observable.clone(),
			engine: self.engine.clone(),
		}
	}
}

impl<T> std::ops::Deref for State<T> {
	type Target = Observable<T>;

	fn deref(&self) -> &Observable<T> {
		&self.observable
	}
}

impl<T: Clone + PartialEq + Send + Sync + 'static> State<T> {
	/// Builds a `State` from an initial expression, evaluating it once to seed the cache and
	/// establish the initial dependency set.
	///
	/// `distinct` suppresses re-fires when a recomputed value equals the previous one (by
	/// [`PartialEq`]); `cache_enabled` controls whether [`get`](Self::get) reuses the cached value
	/// between dependency fires or re-evaluates the expression on every read.
	#[must_use]
	pub fn new(function: impl Fn() -> T + Send + Sync + 'static, distinct: bool, cache_enabled: bool) -> Self {
		let observable = Observable::new();
		let function: Expr<T> = Arc::new(function);

		let scope = DependencyContext::push();
		let value = function();
		let mut captured = scope.finish();
		captured.remove(&observable.id());

		let engine = Arc::new(Engine {
			inner: PLMutex::new(Inner {
				function,
				cached_value: value,
				dependencies: HashMap::new(),
				previous_stack: None,
			}),
			distinct,
			cache_enabled,
		});

		let state = Self { observable, engine };
		{
			let mut inner = state.engine.inner.lock();
			state.attach_monitors(&mut inner, &captured);
		}
		#[cfg(feature = "tracing")]
		tracing::trace!(node = ?state.observable.id(), dependencies = captured.len(), "state created");
		state
	}

	/// Returns the current value, evaluating the expression if it has never run or caching is
	/// disabled.
	#[must_use]
	pub fn get(&self) -> T {
		self.try_read(true).unwrap_or_else(|error| panic!("{error}"))
	}

	/// Alias for [`get`](Self::get), matching how the value shows up on the wire.
	#[must_use]
	pub fn value(&self) -> T {
		self.get()
	}

	/// The set of nodes this state is currently depending on, as captured by its last evaluation.
	#[must_use]
	pub fn observing(&self) -> HashSet<NodeId> {
		self.engine.inner.lock().dependencies.keys().copied().collect()
	}

	/// Installs a new expression, re-evaluates it, rewires dependency monitors to match, and fires
	/// if the resulting value changed (subject to `distinct`).
	///
	/// Mutually exclusive with any other `replace`/recompute on this node; a recursing fire handler
	/// calling back into `replace` on the same node from the same thread deadlocks rather than
	/// corrupting state, since `parking_lot::Mutex` is not reentrant. The lock is held for the whole
	/// re-evaluation and dependency rewrite, so a concurrent reader sees this node either fully
	/// before or fully after this call, but is released before firing, so a listener calling back
	/// into `get`/`observing` on this same node from its own callback does not deadlock.
	pub fn replace(&self, new_function: impl Fn() -> T + Send + Sync + 'static) -> Vec<ReactiveError> {
		let mut inner = self.engine.inner.lock();
		#[cfg(feature = "tracing")]
		tracing::trace!(node = ?self.observable.id(), "replacing expression");
		let new_function: Expr<T> = Arc::new(new_function);

		let pushed = Arc::new(PrevNode {
			function: inner.function.clone(),
			previous: inner.previous_stack.clone(),
		});
		inner.previous_stack = Some(pushed);
		inner.function = new_function.clone();

		let (new_value, self_referential) = self.evaluate_and_diff(&mut inner, &new_function);
		if !self_referential {
			inner.previous_stack = None;
		}

		let to_fire = self.settle_value(&mut inner, new_value);
		drop(inner);
		match to_fire {
			Some(value) => self.observable.fire(value),
			None => Vec::new(),
		}
	}

	/// Re-evaluates the current function (in reaction to a dependency's fire) and rewires
	/// dependency monitors to match whatever it reads this time, same as [`replace`](Self::replace)
	/// does for a newly installed one.
	fn recompute(&self) -> Vec<ReactiveError> {
		let mut inner = self.engine.inner.lock();
		let function = inner.function.clone();
		let (new_value, _self_referential) = self.evaluate_and_diff(&mut inner, &function);
		let to_fire = self.settle_value(&mut inner, new_value);
		drop(inner);
		match to_fire {
			Some(value) => self.observable.fire(value),
			None => Vec::new(),
		}
	}

	/// Runs `function` under a fresh dependency-capturing scope, primed with `inner`'s current
	/// `previousStack` top so a self-referential `function` resolves `this` correctly, then rewires
	/// this node's dependency monitors (still under `inner`'s lock) to match what was captured.
	///
	/// Returns the computed value and whether `function` read `this` (i.e. depended on this node's
	/// own previous value).
	fn evaluate_and_diff(&self, inner: &mut Inner<T>, function: &Expr<T>) -> (T, bool) {
		let id = self.observable.id();
		let scope = DependencyContext::push();
		let top = inner.previous_stack.clone();
		let guard = ripple_core::recursion::install(id, Box::new((top, 0usize)));
		let value = function();
		drop(guard);

		let mut captured = scope.finish();
		let self_referential = captured.remove(&id);
		self.rewire_dependencies(inner, captured);
		(value, self_referential)
	}

	fn rewire_dependencies(&self, inner: &mut Inner<T>, captured: HashSet<NodeId>) {
		let stale: Vec<NodeId> = inner
			.dependencies
			.keys()
			.copied()
			.filter(|id| !captured.contains(id))
			.collect();
		for id in stale {
			if let Some((dependency, handle)) = inner.dependencies.remove(&id) {
				dependency.detach_monitor(handle);
			}
		}
		let fresh: HashSet<NodeId> = captured
			.into_iter()
			.filter(|id| !inner.dependencies.contains_key(id))
			.collect();
		self.attach_monitors(inner, &fresh);
	}

	fn attach_monitors(&self, inner: &mut Inner<T>, ids: &HashSet<NodeId>) {
		for &id in ids {
			let Some(dependency) = registry::lookup(id) else {
				#[cfg(feature = "tracing")]
				tracing::trace!(node = ?self.observable.id(), dependency = ?id, "dependency vanished before monitor could attach");
				continue;
			};
			let this = self.clone();
			let handle = dependency.attach_monitor(Arc::new(move || this.on_dependency_fired()));
			inner.dependencies.insert(id, (dependency, handle));
		}
	}

	fn on_dependency_fired(&self) {
		let errors = self.recompute();
		#[cfg(feature = "tracing")]
		for error in &errors {
			tracing::warn!(node = ?self.observable.id(), %error, "a listener failed while reacting to a dependency change");
		}
		// `errors` is otherwise discarded here: this monitor's `Fn()` signature has nowhere to
		// return it to, but `recompute`'s own `fire` already recorded the same errors into
		// `ripple_core::fire_errors` for the outermost `fire` on this thread to collect.
		#[cfg(not(feature = "tracing"))]
		let _ = errors;
	}

	/// Updates the cached value under `inner`'s lock and reports what (if anything) should be
	/// fired, without firing it — firing has to happen after the lock is released, since a listener
	/// may call back into this same node's `get`/`observing`.
	fn settle_value(&self, inner: &mut Inner<T>, new_value: T) -> Option<T> {
		if self.engine.distinct && inner.cached_value == new_value {
			return None;
		}
		inner.cached_value = new_value.clone();
		Some(new_value)
	}

	/// Disposes the underlying observable and detaches this node's monitor from every remaining
	/// dependency, so dropping the last `State` handle also drops its dependency edges.
	pub fn dispose(&self) {
		let mut inner = self.engine.inner.lock();
		let dependencies = std::mem::take(&mut inner.dependencies);
		drop(inner);
		for (_, (dependency, handle)) in dependencies {
			dependency.detach_monitor(handle);
		}
		self.observable.dispose();
	}

	/// Reads this node's value, as a `Result` so a recursion-depth failure can be distinguished from
	/// a plain evaluation. [`get`](Self::get) is the infallible convenience built on top.
	fn try_read(&self, use_cache: bool) -> Result<T, ReactiveError> {
		let id = self.observable.id();
		DependencyContext::reference(id);

		match ripple_core::recursion::take(id) {
			Some(boxed) => {
				let (slot, depth) = *boxed
					.downcast::<(Option<Arc<PrevNode<T>>>, usize)>()
					.expect("recursion slot holds the wrong type for this node");
				match slot {
					Some(node) => {
						ripple_core::recursion::set(id, Box::new((node.previous.clone(), depth + 1)));
						Ok((node.function)())
					}
					None => Err(ReactiveError::RecursionExhausted { node: id, depth }),
				}
			}
			None => {
				// Read `previous_stack` together with either `cached_value` or `function`, under
				// one lock acquisition, so a concurrent `replace` cannot be observed half-applied
				// (e.g. the new, self-referential `function` paired with the old `previous_stack`).
				let inner = self.engine.inner.lock();
				let top = inner.previous_stack.clone();
				if use_cache && self.engine.cache_enabled {
					let value = inner.cached_value.clone();
					drop(inner);
					let _guard = ripple_core::recursion::install(id, Box::new((top, 0usize)));
					Ok(value)
				} else {
					let function = inner.function.clone();
					drop(inner);
					let _guard = ripple_core::recursion::install(id, Box::new((top, 0usize)));
					Ok(function())
				}
			}
		}
	}
}
