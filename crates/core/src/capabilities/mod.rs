//! Capability negotiation between config contexts and implementations
//!
//! Applications describe what they need as one or more [`ConfigContext`]s,
//! each a sparse set of typed property constraints addressed by path. Every
//! candidate implementation reports an [`ImplDescription`]. [`validate`]
//! accepts the candidate only if it satisfies every context, and returns the
//! [`SpecialConfig`] values the caller uses to finish initialization.
//!
//! # Features
//!
//! - **Property paths**: the dotted path vocabulary applications use, resolved
//!   to a closed [`PropertyId`] set
//! - **Owned contexts**: pointer-typed values (ranges, strings) are copied in
//! - **Flattening**: nested decoder/encoder/filter trees become flat records
//! - **Matching**: exact integers, range subsumption, token subsumption
//!
//! # Example
//!
//! ```rust
//! use mediadispatch_core::capabilities::{
//!     constants::codec, validate, ConfigContext, ImplDescription, LibraryKind, Variant,
//! };
//!
//! let mut cfg = ConfigContext::new();
//! cfg.set_filter_property(
//!     "mfxImplDescription.mfxDecoderDescription.decoder.CodecID",
//!     Variant::U32(codec::HEVC),
//! )
//! .unwrap();
//!
//! // a description without decoders cannot satisfy a decoder constraint
//! let desc = ImplDescription::default();
//! assert!(validate(&desc, None, &[cfg], LibraryKind::Vpl).is_err());
//! ```

// Property schema and typed values
pub mod constraints;

// Well-known codec, format and mode values
pub mod constants;

// Path -> property id
pub mod resolver;

// Caller-built constraint sets
pub mod context;

// Implementation self-descriptions
pub mod description;

// Nested description trees -> flat records
pub mod flatten;

// Device id string grammar
pub mod device_id;

// Context vs description checks
pub mod validation;

// Multi-context driver
pub mod negotiation;

pub use constraints::{
    DeviceHandle, PropertyCategory, PropertyId, PropertyValue, PtrData, Range32U, ScalarType,
    ValueKind, Variant, PROPERTY_COUNT,
};

pub use context::ConfigContext;

pub use description::{
    ApiVersion, DecCodec, DecMemDesc, DecProfile, DecoderDescription, DeviceDescription,
    EncCodec, EncMemDesc, EncProfile, EncoderDescription, ImplDescription, ImplementedFunctions,
    VppDescription, VppFilter, VppFormat, VppMemDesc,
};

pub use device_id::{parse_device_id, DeviceId};

pub use flatten::{DecodeConfig, EncodeConfig, FilterConfig, FlatDescriptions};

pub use negotiation::{validate, LibraryKind, SpecialConfig};

pub use resolver::resolve_property;
