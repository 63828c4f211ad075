//! Low-level dependency-tracking runtime backing `ripple`.
//!
//! This crate has no notion of "what a signal is" beyond opaque [`NodeId`]s: it tracks which ids
//! are read while a closure runs ([`dependency`]), provides the per-fire stop token
//! ([`Invocation`]), a thread-local recursion fallback slot ([`recursion`]) for self-referential
//! expressions, a type-erased [`registry`] so a dependent can rewire edges to dependencies it
//! knows only by id, and the crate's shared [`ReactiveError`] type.

mod id;
pub use id::{ListenerHandle, NodeId};

mod error;
pub use error::ReactiveError;

mod invocation;
pub use invocation::Invocation;

pub mod dependency;
pub use dependency::DependencyContext;

pub mod recursion;

pub mod registry;
pub use registry::Attachable;

pub mod fire_errors;
