//! Convenient and full-featured functional-reactive properties for Rust.
//!
//! - [`Observable`] multicasts values to attached listeners.
//! - [`State`] derives a cached value from an expression and recomputes it when a dependency
//!   fires, without the expression ever naming what it depends on — reading a node inside an
//!   expression is enough to register the dependency.
//! - [`Channel`] is a write-only [`Observable`]; [`StateChannel`] (aliased [`Var`]) is a [`State`]
//!   that can also be written to directly.
//! - [`Binding`] keeps two [`StateChannel`]s in sync in both directions.

mod listener;
pub use listener::{Invocation, Listener, ListenerHandle};

mod observable;
pub use observable::{Completion, Observable};

mod state;
pub use state::State;

mod channel;
pub use channel::Channel;

mod state_channel;
pub use state_channel::{StateChannel, Var};

mod binding;
pub use binding::{bind, BindSet, Binding};

pub use ripple_core::{NodeId, ReactiveError};
