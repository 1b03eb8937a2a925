//! Pipeline lifecycle events.
//! Synchronous dispatch to registered handlers; zero cost when none are registered.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ReinstateEventHandler;
pub use types::*;
