use std::sync::Arc;

pub use ripple_core::{Invocation, ListenerHandle};

/// An identity-bearing callable attached to an [`Observable`](crate::Observable).
///
/// Two listeners built from identically-behaving closures are still distinct: identity is the
/// [`ListenerHandle`] assigned when the listener is attached, not the closure's behavior.
pub trait Listener<T>: Send + Sync {
	fn call(&self, value: &T, invocation: &Invocation);
}

impl<T, F> Listener<T> for F
where
	F: Fn(&T, &Invocation) + Send + Sync,
{
	fn call(&self, value: &T, invocation: &Invocation) {
		self(value, invocation)
	}
}

pub(crate) struct ListenerEntry<T> {
	pub(crate) handle: ListenerHandle,
	pub(crate) body: Arc<dyn Listener<T>>,
}

impl<T> Clone for ListenerEntry<T> {
	fn clone(&self) -> Self {
		Self {
			handle: self.handle,
			body: self.body.clone(),
		}
	}
}
