//! shlink-tui - Terminal UI for Shlink Console
//!
//! This crate renders the connected component tree with ratatui. Components are
//! registered in a container, connected to the store in shlink-app, and driven
//! by the runner's event loop.

pub mod component;
pub mod components;
pub mod event;
pub mod layout;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use component::{Component, Context, Service, View};
pub use components::{provide_components, resolve_app};
pub use runner::{bootstrap, run, RunConfig, Session};
