//! shlink-app - Application state and orchestration for Shlink Console
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the connector that projects state slices into component props,
//! the dependency container, configuration loading and the HTTP services the
//! background actions call.

pub mod actions;
pub mod api;
pub mod config;
pub mod connect;
pub mod container;
pub mod handler;
pub mod identity;
pub mod input_key;
pub mod message;
pub mod process;
pub mod router;
pub mod server_form;
pub mod short_url_form;
pub mod state;
pub mod store;
pub mod tag_selector;

// Re-export primary types
pub use actions::{handle_action, ActionContext};
pub use api::{HttpShlinkApi, ShlinkApi};
pub use connect::{connect, ActionKey, BoundActions, Connect, Dispatcher, OwnProps, Props};
pub use container::{Container, Resolver};
pub use handler::{UpdateAction, UpdateResult};
pub use identity::{HttpIdentityProvider, IdentityProvider};
pub use input_key::InputKey;
pub use message::Message;
pub use process::process_message;
pub use router::{Route, ServerSection};
pub use state::{AppState, MountId, StateKey};
pub use store::Store;
