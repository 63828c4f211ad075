use ripple_core::{recursion, NodeId};

#[test]
fn take_on_empty_slot_is_none() {
	let node = NodeId::next();
	assert!(recursion::take(node).is_none());
}

#[test]
fn install_then_take_roundtrips() {
	let node = NodeId::next();
	let guard = recursion::install(node, Box::new(7_i32));
	let value = recursion::take(node).expect("value installed above");
	assert_eq!(*value.downcast::<i32>().unwrap(), 7);
	drop(guard);
	// `take` already removed it, so the guard restores "nothing was here before" on drop.
	assert!(recursion::take(node).is_none());
}

#[test]
fn guard_restores_previous_value_on_drop() {
	let node = NodeId::next();
	let _outer = recursion::install(node, Box::new(1_i32));
	{
		let _inner = recursion::install(node, Box::new(2_i32));
		let value = recursion::take(node).unwrap();
		assert_eq!(*value.downcast::<i32>().unwrap(), 2);
		// Re-install so the inner guard's drop has something consistent to restore over.
		let _reinstalled = recursion::install(node, Box::new(2_i32));
	}
	let value = recursion::take(node).unwrap();
	assert_eq!(*value.downcast::<i32>().unwrap(), 1);
}

#[test]
fn set_overwrites_without_tracking_a_restore() {
	let node = NodeId::next();
	recursion::set(node, Box::new(1_i32));
	assert_eq!(*recursion::take(node).unwrap().downcast::<i32>().unwrap(), 1);

	// `set` after a `take` leaves the slot occupied again, with nothing to auto-restore.
	recursion::set(node, Box::new(2_i32));
	assert_eq!(*recursion::take(node).unwrap().downcast::<i32>().unwrap(), 2);
	assert!(recursion::take(node).is_none());
}

#[test]
fn slots_are_independent_per_node() {
	let a = NodeId::next();
	let b = NodeId::next();
	let _ga = recursion::install(a, Box::new("a"));
	let _gb = recursion::install(b, Box::new("b"));
	assert_eq!(*recursion::take(a).unwrap().downcast::<&str>().unwrap(), "a");
	assert_eq!(*recursion::take(b).unwrap().downcast::<&str>().unwrap(), "b");
}
