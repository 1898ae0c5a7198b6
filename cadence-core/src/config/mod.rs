//! Configuration types
//!
//! Board-agnostic configuration structures. With the `serde` feature they
//! can be stored as postcard binary data; with `toml` they can be loaded
//! from a TOML document.

#[cfg(feature = "toml")]
pub mod toml;
pub mod types;

#[cfg(feature = "toml")]
pub use self::toml::from_toml;
pub use types::*;
