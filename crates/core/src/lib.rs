//! MediaDispatch Core - Capability negotiation for media backend dispatch
//!
//! This crate decides which of several independently built media
//! implementations (decoder, encoder and video processing backends) can serve
//! an application, based on the constraints the application declares.
//!
//! # Architecture
//!
//! - [`capabilities`]: property schema, config contexts, descriptor
//!   flattening, compatibility checks and the negotiation driver
//! - [`loader`]: owns the application's config contexts and filters a list of
//!   discovered candidates
//! - [`manifest`]: JSON/YAML description of a negotiation session
//!
//! Discovering implementations on disk and loading them is left to the
//! caller; this crate only sees their self-descriptions.
//!
//! # Example
//!
//! ```rust
//! use mediadispatch_core::capabilities::{constants::impl_type, ImplDescription, Variant};
//! use mediadispatch_core::loader::{Candidate, Loader};
//!
//! let mut loader = Loader::new();
//! loader
//!     .create_config()
//!     .set_filter_property("mfxImplDescription.Impl", Variant::U32(impl_type::HARDWARE))
//!     .unwrap();
//!
//! let gpu = Candidate::new(
//!     "gpu",
//!     ImplDescription {
//!         impl_type: impl_type::HARDWARE,
//!         ..Default::default()
//!     },
//! );
//! let cpu = Candidate::new("cpu", ImplDescription::default());
//!
//! let accepted = loader.filter(&[cpu, gpu]);
//! assert_eq!(accepted.len(), 1);
//! assert_eq!(accepted[0].name, "gpu");
//! ```

#![warn(clippy::all)]

pub mod capabilities;

pub mod loader;

pub mod manifest;

// Error types
mod error;
pub use error::{Error, Result};
