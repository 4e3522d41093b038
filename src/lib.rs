//! Library exports for the mapgesture input pipeline.
//!
//! Exposes the gesture classifier, the interaction chain and the event
//! handler that ties them together, alongside the configuration and replay
//! support used by the command-line tool.

pub mod config;
pub mod input;
pub mod replay;
pub mod util;

pub use config::Config;
pub use input::EventHandler;
