//! Implementation capability descriptors
//!
//! An [`ImplDescription`] is what a candidate implementation reports about
//! itself: identity, device, API version, and three nested capability trees
//! (decoders, encoders, video processing filters). The dispatcher only reads
//! these values; they arrive from the enumeration layer or from a manifest.
//!
//! Nesting of the decoder tree (the encoder tree is the same shape):
//!
//! ```text
//! DecoderDescription
//! └── DecCodec        (CodecID, MaxcodecLevel)
//!     └── DecProfile  (Profile)
//!         └── DecMemDesc (MemHandleType, Width, Height)
//!             └── color format
//! ```
//!
//! The filter tree is `VppFilter → VppMemDesc → VppFormat → out format`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::constraints::Range32U;

// =============================================================================
// API Version
// =============================================================================

/// API version as a major/minor pair.
///
/// The packed form used by the `ApiVersion.Version` property keeps the major
/// version in the high 16 bits and the minor version in the low 16 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
}

impl ApiVersion {
    /// Create a version from its parts.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Unpack a combined 32-bit version.
    pub const fn from_packed(version: u32) -> Self {
        Self {
            major: (version >> 16) as u16,
            minor: (version & 0xFFFF) as u16,
        }
    }

    /// Combined 32-bit version.
    pub const fn packed(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// =============================================================================
// Top-level Description
// =============================================================================

/// Self-reported capabilities of one implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplDescription {
    /// Implementation type (software or hardware)
    #[serde(rename = "impl")]
    pub impl_type: u32,
    /// Default acceleration mode
    pub acceleration_mode: u32,
    /// All supported acceleration modes; empty if only the default is reported
    pub acceleration_modes: Vec<u32>,
    /// Supported API version
    pub api_version: ApiVersion,
    /// Implementation name
    pub impl_name: String,
    /// Comma-separated license tokens
    pub license: String,
    /// Comma-separated keyword tokens
    pub keywords: String,
    /// Vendor id
    pub vendor_id: u32,
    /// Vendor-specific implementation id
    pub vendor_impl_id: u32,
    /// Device the implementation runs on
    pub device: DeviceDescription,
    /// Decoder capabilities
    pub dec: DecoderDescription,
    /// Encoder capabilities
    pub enc: EncoderDescription,
    /// Video processing capabilities
    pub vpp: VppDescription,
}

impl ImplDescription {
    /// Parse a description from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Device identity reported by an implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceDescription {
    /// Device id as hex digits, optionally followed by `/adapter-index`
    pub device_id: String,
    /// Media adapter type (integrated, discrete)
    pub media_adapter_type: u16,
}

// =============================================================================
// Decoder Tree
// =============================================================================

/// Decoder capability tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderDescription {
    /// One entry per supported codec.
    pub codecs: Vec<DecCodec>,
}

/// A decodable codec and its profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecCodec {
    /// Codec FourCC
    pub codec_id: u32,
    /// Highest codec level the decoder handles
    pub max_codec_level: u16,
    pub profiles: Vec<DecProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecProfile {
    /// Codec-specific profile value
    pub profile: u32,
    /// Memory types the profile can decode into
    pub mem_desc: Vec<DecMemDesc>,
}

/// Surface limits for one memory type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecMemDesc {
    pub mem_handle_type: u32,
    /// Supported frame width
    pub width: Range32U,
    /// Supported frame height
    pub height: Range32U,
    /// Output color format FourCCs
    pub color_formats: Vec<u32>,
}

// =============================================================================
// Encoder Tree
// =============================================================================

/// Encoder capability tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderDescription {
    /// One entry per supported codec.
    pub codecs: Vec<EncCodec>,
}

/// An encodable codec and its profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncCodec {
    /// Codec FourCC
    pub codec_id: u32,
    pub max_codec_level: u16,
    /// Nonzero if B-frames are supported
    pub bidirectional_prediction: u16,
    pub profiles: Vec<EncProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncProfile {
    pub profile: u32,
    /// Memory types the profile can encode from
    pub mem_desc: Vec<EncMemDesc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncMemDesc {
    pub mem_handle_type: u32,
    pub width: Range32U,
    pub height: Range32U,
    /// Input color format FourCCs
    pub color_formats: Vec<u32>,
}

// =============================================================================
// Video Processing Tree
// =============================================================================

/// Video processing (filter) capability tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VppDescription {
    /// One entry per supported filter.
    pub filters: Vec<VppFilter>,
}

/// A video processing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VppFilter {
    /// Filter FourCC
    pub filter_fourcc: u32,
    /// Frames of latency the filter adds
    pub max_delay_in_frames: u16,
    pub mem_desc: Vec<VppMemDesc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VppMemDesc {
    pub mem_handle_type: u32,
    pub width: Range32U,
    pub height: Range32U,
    /// Supported input formats and their outputs
    pub formats: Vec<VppFormat>,
}

/// One input color format and the output formats it converts to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VppFormat {
    /// Input color format FourCC
    pub in_format: u32,
    /// Output color format FourCCs
    pub out_formats: Vec<u32>,
}

// =============================================================================
// Implemented Functions
// =============================================================================

/// Entry points an implementation reports as implemented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementedFunctions {
    /// Exported function names, compared case-sensitively
    pub function_names: Vec<String>,
}

impl ImplementedFunctions {
    /// Build from any list of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function_names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check for an exact (case-sensitive) name.
    pub fn contains(&self, name: &str) -> bool {
        self.function_names.iter().any(|f| f == name)
    }
}
