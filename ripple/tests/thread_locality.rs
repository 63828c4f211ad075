use std::sync::{Arc, Barrier};
use std::thread;

use ripple::{State, Var};

/// Property 8: evaluating a `State` on one thread must not pick up reads made concurrently, on an
/// unrelated `State`, on another thread.
#[test]
fn concurrent_evaluation_on_different_threads_does_not_cross_contaminate_dependencies() {
	let a = Var::new(1);
	let b = Var::new(2);
	let unrelated = Var::new(100);

	let barrier = Arc::new(Barrier::new(2));

	let a_for_thread = a.clone();
	let barrier_for_thread = barrier.clone();
	let handle = thread::spawn(move || {
		barrier_for_thread.wait();
		State::new(move || a_for_thread.get(), false, true)
	});

	barrier.wait();
	let b_for_state = b.clone();
	let unrelated_for_state = unrelated.clone();
	let derived_b = State::new(move || b_for_state.get() + unrelated_for_state.get(), false, true);

	let derived_a = handle.join().unwrap();

	assert_eq!(derived_a.observing(), [a.id()].into_iter().collect());
	assert_eq!(derived_b.observing(), [b.id(), unrelated.id()].into_iter().collect());
}
