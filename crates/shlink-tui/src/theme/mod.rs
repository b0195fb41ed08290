//! Theme system.
//!
//! This module provides:
//! - `palette`: light and dark color palettes
//! - `styles`: semantic style builder functions

pub mod palette;
pub mod styles;

pub use palette::Palette;
