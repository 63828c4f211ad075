use std::sync::{Arc, Mutex};

use ripple::{ReactiveError, State, Var};

#[test]
fn s1_derived_state_tracks_its_dependencies() {
	let a = Var::new(2);
	let b = Var::new(3);

	let a_for_c = a.clone();
	let b_for_c = b.clone();
	let c = State::new(move || a_for_c.get() + b_for_c.get(), false, true);
	assert_eq!(c.get(), 5);

	let fires = Arc::new(Mutex::new(Vec::new()));
	let fires_for_body = fires.clone();
	c.attach(move |value| fires_for_body.lock().unwrap().push(*value));

	a.send_static(10);

	assert_eq!(c.get(), 13);
	assert_eq!(*fires.lock().unwrap(), vec![13]);
}

#[test]
fn s2_distinct_state_only_fires_when_its_value_actually_changes() {
	let x = Var::new(1);
	let x_for_y = x.clone();
	let y = State::new(move || x_for_y.get() * 2, true, true);

	let fire_count = Arc::new(Mutex::new(0));
	let fire_count_for_body = fire_count.clone();
	y.attach(move |_| *fire_count_for_body.lock().unwrap() += 1);

	x.send_static(1); // x is already 1, so x itself is distinct-suppressed and never fires
	assert_eq!(*fire_count.lock().unwrap(), 0);

	x.send_static(2);
	assert_eq!(*fire_count.lock().unwrap(), 1);
	assert_eq!(y.get(), 4);
}

#[test]
fn s3_self_referential_replace_resolves_to_the_previous_function() {
	let v = Var::new(0);

	let v_for_expr = v.clone();
	v.replace(move || v_for_expr.get() + 1);

	assert_eq!(v.get(), 1);
}

#[test]
fn s5_disposed_state_stops_reacting_to_its_former_dependency() {
	let a = Var::new(1);
	let a_for_b = a.clone();
	let b = State::new(move || a_for_b.get() + 1, false, true);
	assert_eq!(b.get(), 2);

	let fires = Arc::new(Mutex::new(0));
	let fires_for_body = fires.clone();
	b.attach(move |_| *fires_for_body.lock().unwrap() += 1);

	b.dispose();
	a.send_static(5); // must not panic and must not reach b's listener

	assert_eq!(*fires.lock().unwrap(), 0);
}

#[test]
fn s6_dependency_set_tracks_the_branch_actually_taken() {
	let n = Var::new(0i32);
	let m = Var::new(99i32);

	let n_for_d = n.clone();
	let m_for_d = m.clone();
	let d = State::new(
		move || if n_for_d.get() < 3 { n_for_d.get() } else { m_for_d.get() },
		false,
		true,
	);
	assert_eq!(d.get(), 0);
	assert!(!d.observing().contains(&m.id()));

	n.send_static(5);
	assert_eq!(d.get(), 99);
	assert!(d.observing().contains(&m.id()));

	n.send_static(2);
	assert_eq!(d.get(), 2);
	assert!(!d.observing().contains(&m.id()));
}

#[test]
fn dependency_diff_detaches_monitors_on_dropped_dependencies() {
	let flag = Var::new(true);
	let left = Var::new(1);
	let right = Var::new(2);

	let flag_for_d = flag.clone();
	let left_for_d = left.clone();
	let right_for_d = right.clone();
	let derived = State::new(
		move || if flag_for_d.get() { left_for_d.get() } else { right_for_d.get() },
		false,
		true,
	);
	assert_eq!(derived.observing(), [left.id()].into_iter().collect());

	flag.send_static(false);
	assert_eq!(derived.observing(), [right.id()].into_iter().collect());

	let fires = Arc::new(Mutex::new(0));
	let fires_for_body = fires.clone();
	derived.attach(move |_| *fires_for_body.lock().unwrap() += 1);

	left.send_static(100); // no longer a dependency, must not trigger a recompute
	assert_eq!(*fires.lock().unwrap(), 0);

	right.send_static(200);
	assert_eq!(*fires.lock().unwrap(), 1);
	assert_eq!(derived.get(), 200);
}

#[test]
fn repeated_self_referential_replace_does_not_overflow_and_chains_correctly() {
	let v = Var::new(0);

	let v_for_first = v.clone();
	v.replace(move || v_for_first.get() + 1); // v == 1, previousStack: [returns 0]

	let v_for_second = v.clone();
	v.replace(move || v_for_second.get() + 1); // v == 2, previousStack: [returns 1, [returns 0]]

	assert_eq!(v.get(), 2);
}

#[test]
fn a_panic_two_recomputes_downstream_surfaces_to_the_top_level_caller() {
	let n = Var::new(1);
	let n_for_d = n.clone();
	let d = State::new(move || n_for_d.get() + 1, false, true);
	d.attach(|_| panic!("boom"));

	let errors = n.send_static(2);

	assert_eq!(errors.len(), 1);
	assert!(matches!(errors[0], ReactiveError::UserPanic { .. }));
	// The panicking listener does not stop the value itself from updating.
	assert_eq!(d.get(), 3);
}

#[test]
#[should_panic(expected = "previous-function stack")]
fn reading_this_more_times_than_the_previous_stack_supports_panics() {
	let v = Var::new(0);

	let v_for_expr = v.clone();
	// Reads `this` twice in one expression; only one previous function is available.
	v.replace(move || v_for_expr.get() + v_for_expr.get());
}
