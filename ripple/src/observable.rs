use std::{
	panic::{catch_unwind, AssertUnwindSafe},
	sync::{Arc, Condvar, Mutex, Weak},
};

use parking_lot::Mutex as PLMutex;
use ripple_core::{registry, Attachable, Invocation, NodeId, ReactiveError};

use crate::listener::{Listener, ListenerEntry, ListenerHandle};

struct ObservableInner<T> {
	id: NodeId,
	listeners: PLMutex<Vec<ListenerEntry<T>>>,
}

/// A node that multicasts values to attached listeners.
///
/// `Observable` is the base capability every reactive node in this crate builds on: [`Channel`]
/// fires directly, and [`State`](crate::State) fires whenever one of its dependencies does.
/// Cloning an `Observable` clones a handle to the same underlying node (cheap, `Arc`-backed).
pub struct Observable<T> {
	inner: Arc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: 'static> Default for Observable<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: 'static> Observable<T> {
	#[must_use]
	pub fn new() -> Self {
		let id = NodeId::next();
		let inner = Arc::new(ObservableInner {
			id,
			listeners: PLMutex::new(Vec::new()),
		});
		let weak: Weak<ObservableInner<T>> = Arc::downgrade(&inner);
		registry::register(weak, id);
		#[cfg(feature = "tracing")]
		tracing::trace!(node = ?id, "observable created");
		Self { inner }
	}
}

impl<T: 'static> Attachable for ObservableInner<T> {
	fn id(&self) -> NodeId {
		self.id
	}

	fn attach_monitor(&self, body: Arc<dyn Fn() + Send + Sync>) -> ListenerHandle {
		let handle = ListenerHandle::next();
		self.listeners.lock().push(ListenerEntry {
			handle,
			body: Arc::new(move |_value: &T, _invocation: &Invocation| body()),
		});
		handle
	}

	fn detach_monitor(&self, handle: ListenerHandle) {
		self.listeners.lock().retain(|entry| entry.handle != handle);
	}
}

impl<T> Observable<T> {
	#[must_use]
	pub fn id(&self) -> NodeId {
		self.inner.id
	}

	/// Adds an existing listener, preserving insertion order.
	pub fn observe(&self, body: Arc<dyn Listener<T>>) -> ListenerHandle {
		let handle = ListenerHandle(NodeId::next());
		self.inner.listeners.lock().push(ListenerEntry { handle, body });
		handle
	}

	/// Attaches `f`, invoked with each fired value.
	pub fn attach(&self, f: impl Fn(&T) + Send + Sync + 'static) -> ListenerHandle
	where
		T: 'static,
	{
		self.observe(Arc::new(move |value: &T, _invocation: &Invocation| f(value)))
	}

	/// Attaches `body`, invoked on every fire without regard to the value.
	pub fn on(&self, body: impl Fn() + Send + Sync + 'static) -> ListenerHandle
	where
		T: 'static,
	{
		self.attach(move |_value| body())
	}

	/// Removes a listener by identity. Idempotent: detaching an unknown or already-detached handle
	/// is a no-op.
	pub fn detach(&self, handle: ListenerHandle) {
		self.inner.listeners.lock().retain(|entry| entry.handle != handle);
	}

	/// Removes all listeners.
	pub fn clear(&self) {
		self.inner.listeners.lock().clear();
	}

	/// Removes all listeners and forgets this node in the global registry, so dependents can no
	/// longer rewire monitors onto it. For a base `Observable` this is otherwise identical to
	/// [`clear`](Self::clear); derived nodes override the meaning to also release their own
	/// dependency edges.
	pub fn dispose(&self) {
		self.clear();
		registry::unregister(self.inner.id);
	}

	/// Attaches a listener that detaches itself (before running `f`) the first time `condition`
	/// holds for a fired value.
	pub fn once(
		&self,
		condition: impl Fn(&T) -> bool + Send + Sync + 'static,
		f: impl Fn(&T) + Send + Sync + 'static,
	) -> ListenerHandle
	where
		T: 'static,
	{
		let slot: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));
		let this = self.clone();
		let slot_for_body = slot.clone();
		let handle = self.observe(Arc::new(move |value: &T, _invocation: &Invocation| {
			if condition(value) {
				if let Some(own_handle) = slot_for_body.lock().unwrap().take() {
					this.detach(own_handle);
				}
				f(value);
			}
		}));
		*slot.lock().unwrap() = Some(handle);
		handle
	}

	/// Attaches a listener invoked with `(previous, current)`. The first fire after attachment is
	/// delivered with `previous = None`.
	pub fn changes(&self, listener: impl Fn(Option<&T>, &T) + Send + Sync + 'static) -> ListenerHandle
	where
		T: Clone + Send + Sync + 'static,
	{
		let previous: Mutex<Option<T>> = Mutex::new(None);
		self.observe(Arc::new(move |value: &T, _invocation: &Invocation| {
			let old = previous.lock().unwrap().replace(value.clone());
			listener(old.as_ref(), value);
		}))
	}

	/// Returns a token that [`wait`](Completion::wait)s, blocking the calling thread, until the
	/// next fire satisfying `condition`.
	///
	/// There is no executor anywhere in this crate, so this is a blocking call rather than a
	/// `Future` impl.
	pub fn future(&self, condition: impl Fn(&T) -> bool + Send + Sync + 'static) -> Completion<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let state = Arc::new((Mutex::new(None::<T>), Condvar::new()));
		let state_for_body = state.clone();
		self.once(condition, move |value| {
			*state_for_body.0.lock().unwrap() = Some(value.clone());
			state_for_body.1.notify_all();
		});
		Completion { state }
	}

	/// Derives a new `Observable` that re-fires only when the value differs (by [`PartialEq`])
	/// from the last one it fired.
	pub fn distinct(&self) -> Observable<T>
	where
		T: Clone + PartialEq + Send + Sync + 'static,
	{
		let relay = Observable::new();
		let relay_for_body = relay.clone();
		let last: Mutex<Option<T>> = Mutex::new(None);
		self.observe(Arc::new(move |value: &T, _invocation: &Invocation| {
			let mut last = last.lock().unwrap();
			if last.as_ref() != Some(value) {
				*last = Some(value.clone());
				drop(last);
				relay_for_body.fire(value.clone());
			}
		}));
		relay
	}

	/// Invokes every listener with `value`, in attachment order, over the snapshot of listeners
	/// held at entry. A listener may call `Invocation::stop` on the shared token to suppress
	/// delivery to listeners later in that snapshot.
	///
	/// A listener whose body panics does not stop the remaining listeners from running: the panic
	/// is caught and reported in the returned `Vec` after every listener in the snapshot has been
	/// attempted.
	///
	/// A listener may itself be a `State`'s dependency monitor, whose body triggers that `State`'s
	/// own recompute-and-`fire`. Any error from such a nested `fire` cannot reach back through the
	/// monitor's bare `Fn()` signature, so it is recorded into the thread-local sink in
	/// [`ripple_core::fire_errors`] instead; whichever `fire` call is outermost on this thread drains
	/// that sink and folds the transitive errors into its own returned `Vec`, so a panic several
	/// recomputations downstream still surfaces to the caller that triggered the original write.
	pub fn fire(&self, value: T) -> Vec<ReactiveError> {
		let snapshot: Vec<ListenerEntry<T>> = self.inner.listeners.lock().clone();
		#[cfg(feature = "tracing")]
		tracing::trace!(node = ?self.inner.id, listeners = snapshot.len(), "firing");
		let invocation = Invocation::new();
		let scope = ripple_core::fire_errors::FireErrorsScope::enter();
		let mut errors = Vec::new();
		for entry in snapshot {
			if invocation.is_stopped() {
				break;
			}
			let outcome = catch_unwind(AssertUnwindSafe(|| entry.body.call(&value, &invocation)));
			if outcome.is_err() {
				#[cfg(feature = "tracing")]
				tracing::warn!(node = ?self.inner.id, listener = ?entry.handle.0, "listener panicked during fire");
				let error = ReactiveError::UserPanic {
					node: self.inner.id,
					listener: entry.handle.0,
				};
				if scope.owns() {
					errors.push(error);
				} else {
					// Not the outermost fire on this thread: the direct caller here (a State's own
					// recompute, reached via a dependency's monitor) discards its return value, so
					// record it for the outermost fire to pick up instead of losing it.
					ripple_core::fire_errors::record(error.clone());
					errors.push(error);
				}
			}
		}
		if let Some(transitive) = scope.finish() {
			errors.extend(transitive);
		}
		errors
	}
}

/// One-shot completion token produced by [`Observable::future`].
pub struct Completion<T> {
	state: Arc<(Mutex<Option<T>>, Condvar)>,
}

impl<T> Completion<T> {
	/// Blocks the calling thread until the awaited fire happens, then returns its value.
	#[must_use]
	pub fn wait(self) -> T {
		let (lock, condvar) = &*self.state;
		let mut guard = lock.lock().unwrap();
		while guard.is_none() {
			guard = condvar.wait(guard).unwrap();
		}
		guard.take().expect("guarded by the loop above")
	}
}
