use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

use crate::listener::ListenerHandle;
use crate::state_channel::StateChannel;

/// Which side's current value wins when a [`Binding`] is first established.
pub enum BindSet {
	/// Write the left side's current value into the right side.
	LeftToRight,
	/// Write the right side's current value into the left side.
	RightToLeft,
	/// Leave both sides as they are; only future writes propagate.
	None,
}

/// A live two-way link between two [`StateChannel`]s, converting through `a_to_b`/`b_to_a`.
///
/// Writing to either side schedules a converted write on the other, guarded by a shared flag so
/// that write does not bounce back and re-trigger the side that caused it.
pub struct Binding<A, B> {
	left: StateChannel<A>,
	right: StateChannel<B>,
	left_handle: ListenerHandle,
	right_handle: ListenerHandle,
}

impl<A, B> Binding<A, B> {
	/// Breaks the link. Each side keeps whatever value it last held.
	pub fn dispose(&self) {
		self.left.detach(self.left_handle);
		self.right.detach(self.right_handle);
	}
}

/// Establishes a [`Binding`] between two differently-typed [`StateChannel`]s.
///
/// [`StateChannel::bind`] is the same-type convenience built on top of this for the common case
/// where `a_to_b`/`b_to_a` are both the identity.
pub fn bind<A, B>(
	left: &StateChannel<A>,
	right: &StateChannel<B>,
	a_to_b: impl Fn(&A) -> B + Send + Sync + 'static,
	b_to_a: impl Fn(&B) -> A + Send + Sync + 'static,
	set_now: BindSet,
) -> Binding<A, B>
where
	A: Clone + PartialEq + Send + Sync + 'static,
	B: Clone + PartialEq + Send + Sync + 'static,
{
	let a_to_b: Arc<dyn Fn(&A) -> B + Send + Sync> = Arc::new(a_to_b);
	let b_to_a: Arc<dyn Fn(&B) -> A + Send + Sync> = Arc::new(b_to_a);

	match set_now {
		BindSet::LeftToRight => {
			right.send_static(a_to_b(&left.get()));
		}
		BindSet::RightToLeft => {
			left.send_static(b_to_a(&right.get()));
		}
		BindSet::None => {}
	}

	// Shared re-entry guard: a write this binding makes on one side must not be relayed back to
	// the side that caused it.
	let changing = Arc::new(AtomicBool::new(false));

	let right_for_left_listener = right.clone();
	let changing_for_left_listener = changing.clone();
	let a_to_b_for_left_listener = a_to_b.clone();
	let left_handle = left.attach(move |value: &A| {
		if changing_for_left_listener
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
		{
			let _guard = scopeguard::guard((), |()| changing_for_left_listener.store(false, Ordering::Release));
			right_for_left_listener.send_static(a_to_b_for_left_listener(value));
		}
	});

	let left_for_right_listener = left.clone();
	let changing_for_right_listener = changing;
	let right_handle = right.attach(move |value: &B| {
		if changing_for_right_listener
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
		{
			let _guard = scopeguard::guard((), |()| changing_for_right_listener.store(false, Ordering::Release));
			left_for_right_listener.send_static(b_to_a(value));
		}
	});

	Binding {
		left: left.clone(),
		right: right.clone(),
		left_handle,
		right_handle,
	}
}
