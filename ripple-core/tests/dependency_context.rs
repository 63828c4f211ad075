use ripple_core::{DependencyContext, NodeId};

#[test]
fn reference_without_context_is_noop() {
	assert!(!DependencyContext::is_active());
	// Must not panic even though nothing is installed.
	DependencyContext::reference(NodeId::next());
}

#[test]
fn push_captures_references_made_while_active() {
	let a = NodeId::next();
	let b = NodeId::next();

	let scope = DependencyContext::push();
	assert!(DependencyContext::is_active());
	DependencyContext::reference(a);
	DependencyContext::reference(b);
	DependencyContext::reference(a); // duplicate reads collapse to one dependency
	let captured = scope.finish();

	assert_eq!(captured.len(), 2);
	assert!(captured.contains(&a));
	assert!(captured.contains(&b));
	assert!(!DependencyContext::is_active());
}

#[test]
fn nested_push_isolates_outer_context() {
	let outer_id = NodeId::next();
	let inner_id = NodeId::next();

	let outer = DependencyContext::push();
	DependencyContext::reference(outer_id);

	let inner = DependencyContext::push();
	DependencyContext::reference(inner_id);
	let inner_captured = inner.finish();

	// The outer scope must still be active and must not have seen the inner reference.
	DependencyContext::reference(outer_id);
	let outer_captured = outer.finish();

	assert_eq!(inner_captured.len(), 1);
	assert!(inner_captured.contains(&inner_id));
	assert_eq!(outer_captured.len(), 1);
	assert!(outer_captured.contains(&outer_id));
}

#[test]
fn drop_without_finish_still_restores_enclosing_context() {
	let outer_id = NodeId::next();
	let outer = DependencyContext::push();
	DependencyContext::reference(outer_id);

	{
		let inner = DependencyContext::push();
		drop(inner); // simulates an evaluation that unwound before calling `finish`
	}

	assert!(DependencyContext::is_active());
	DependencyContext::reference(outer_id);
	let captured = outer.finish();
	assert!(captured.contains(&outer_id));
	assert!(!DependencyContext::is_active());
}
