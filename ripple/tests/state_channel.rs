use std::sync::{Arc, Mutex};

use ripple::Var;

#[test]
fn var_starts_at_its_initial_value() {
	let v = Var::new(42);
	assert_eq!(v.get(), 42);
}

#[test]
fn send_static_never_captures_a_dependency() {
	let source = Var::new(1);
	let v = Var::new(0);

	let source_for_expr = source.clone();
	v.send_static(source_for_expr.get());
	assert!(v.observing().is_empty());

	// A later change to `source` must not reach `v`, since the write above was a snapshot.
	source.send_static(99);
	assert_eq!(v.get(), 1);
}

#[test]
fn send_expr_turns_a_var_into_a_derived_expression() {
	let source = Var::new(1);
	let v = Var::new(0);

	let source_for_expr = source.clone();
	v.send_expr(move || source_for_expr.get() * 10);
	assert_eq!(v.get(), 10);

	source.send_static(2);
	assert_eq!(v.get(), 20);
}

#[test]
fn var_fires_listeners_on_change() {
	let v = Var::new(1);
	let fires = Arc::new(Mutex::new(Vec::new()));

	let fires_for_body = fires.clone();
	v.attach(move |value| fires_for_body.lock().unwrap().push(*value));

	v.send_static(1); // distinct by default: unchanged, no fire
	v.send_static(2);

	assert_eq!(*fires.lock().unwrap(), vec![2]);
}
