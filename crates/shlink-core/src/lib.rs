//! # shlink-core - Core Domain Types
//!
//! Foundation crate for Shlink Console. Provides domain types, error handling,
//! the tag color service and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing, url).
//!
//! ## Public API
//!
//! ### Servers (`server`)
//! - [`Server`], [`ServerId`], [`ServersMap`] - Registered Shlink instances
//! - [`Reachability`], [`SelectedServer`] - Result of probing a server
//!
//! ### Short URLs (`short_url`)
//! - [`ShortUrl`], [`ShortUrlsList`], [`Pagination`]
//! - [`ShortUrlData`] - Payload for creating a short URL
//! - [`Order`], [`OrderableField`], [`OrderDir`] - List ordering with 3-state toggling
//!
//! ### Tags (`tags`, `color`)
//! - [`TagsList`], [`TagStats`]
//! - [`ColorGenerator`] - Deterministic, memoized tag colors
//!
//! ### Versions (`version`)
//! - [`supports_short_url_titles()`], [`version_match()`]
//!
//! ## Prelude
//!
//! ```rust
//! use shlink_core::prelude::*;
//! ```

pub mod color;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod server;
pub mod short_url;
pub mod tags;
pub mod version;

pub use color::{Color, ColorGenerator, TAG_PALETTE};
pub use error::{Error, Result, ResultExt};
pub use server::{Reachability, SelectedServer, Server, ServerData, ServerId, ServersMap};
pub use short_url::{
    determine_order_dir, Order, OrderDir, OrderableField, Pagination, ShortUrl, ShortUrlData,
    ShortUrlsList,
};
pub use tags::{TagStats, TagsList};
pub use version::{
    printable_version, supports_short_url_titles, version_match, SemVer, ServerVersion,
    VersionConstraint, TITLES_MIN_VERSION,
};
