use ripple_core::Invocation;

#[test]
fn starts_unstopped() {
	let invocation = Invocation::new();
	assert!(!invocation.is_stopped());
}

#[test]
fn stop_latches() {
	let invocation = Invocation::new();
	invocation.stop();
	assert!(invocation.is_stopped());
	invocation.stop();
	assert!(invocation.is_stopped());
}

#[test]
fn reset_clears_stopped() {
	let invocation = Invocation::new();
	invocation.stop();
	invocation.reset();
	assert!(!invocation.is_stopped());
}
