//! Amplification lifecycle events.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::AmplifyEventHandler;
pub use types::*;
