//! Property schema and typed values for config contexts
//!
//! Every filterable or settable property is a [`PropertyId`]. Each id has one
//! stable index and one declared [`ValueKind`], both produced by exhaustive
//! matches, so the schema table and the id set cannot drift apart.
//!
//! Callers hand values to a context as a borrowed [`Variant`]; the context
//! keeps an owned [`PropertyValue`] so it never aliases caller memory.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Scalar Types
// =============================================================================

/// Declared wire type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// Reference to out-of-line data (range, text or opaque handle)
    Ptr,
}

impl ScalarType {
    /// Name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::Ptr => "ptr",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage kind of a property. Pointer-typed properties are split by the
/// data they refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Stored as `u16`
    U16,
    /// Stored as `u32`
    U32,
    /// Stored as an owned [`Range32U`]
    Range,
    /// Stored as an owned `String`
    Text,
    /// Stored as an opaque [`DeviceHandle`]
    Handle,
}

impl ValueKind {
    /// Wire type the caller must supply for this kind.
    pub fn scalar_type(self) -> ScalarType {
        match self {
            ValueKind::U16 => ScalarType::U16,
            ValueKind::U32 => ScalarType::U32,
            ValueKind::Range | ValueKind::Text | ValueKind::Handle => ScalarType::Ptr,
        }
    }

    /// Name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::Range => "range",
            ValueKind::Text => "text",
            ValueKind::Handle => "handle",
        }
    }
}

// =============================================================================
// Out-of-line Data
// =============================================================================

/// Closed, stepped interval of `u32` values (frame width or height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range32U {
    /// Minimum value (inclusive)
    pub min: u32,
    /// Maximum value (inclusive)
    pub max: u32,
    /// Granularity
    pub step: u32,
}

impl Range32U {
    /// Create a new range.
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// Check whether a requested range fits inside this capability range.
    ///
    /// The request must not reach past either bound, and its step must be at
    /// least as coarse as the capability's.
    ///
    /// ```rust
    /// use mediadispatch_core::capabilities::Range32U;
    ///
    /// let capability = Range32U::new(64, 4096, 2);
    /// assert!(capability.subsumes(&Range32U::new(100, 1000, 2)));
    /// assert!(!Range32U::new(64, 512, 2).subsumes(&Range32U::new(100, 1000, 2)));
    /// ```
    pub fn subsumes(&self, requested: &Range32U) -> bool {
        requested.max <= self.max && requested.min >= self.min && requested.step >= self.step
    }
}

/// Opaque native device handle (a display, device or device-manager pointer
/// value). Carried through negotiation untouched and never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceHandle(pub usize);

// =============================================================================
// Property Identifiers
// =============================================================================

/// Logical group a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyCategory {
    /// Top-level implementation and device properties
    General,
    /// Decoder description properties
    Decode,
    /// Encoder description properties
    Encode,
    /// Video processing (filter) description properties
    Filter,
    /// Non-filtering values handed back to the caller
    Special,
    /// Entry points the implementation must export
    Function,
}

/// Closed set of properties a config context can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    /// Implementation type (software or hardware)
    Impl,
    /// Acceleration mode (D3D11, VA-API, ...)
    AccelerationMode,
    /// Packed API version, major in the high half
    ApiVersion,
    /// Major half of the API version
    ApiVersionMajor,
    /// Minor half of the API version
    ApiVersionMinor,
    /// Implementation name, matched exactly
    ImplName,
    /// Comma-separated license tokens
    License,
    /// Comma-separated keyword tokens
    Keywords,
    /// PCI vendor id
    VendorId,
    /// Vendor-specific implementation id
    VendorImplId,

    /// Numeric device id, compared with the parsed descriptor id
    DeviceId,
    /// Device id text, compared as a whole
    DeviceIdStr,

    /// Decoder codec FourCC
    DecCodecId,
    /// Decoder maximum codec level
    DecMaxCodecLevel,
    /// Decoder profile
    DecProfile,
    /// Decoder output memory type
    DecMemHandleType,
    /// Decoder frame width range
    DecWidth,
    /// Decoder frame height range
    DecHeight,
    /// Decoder output color format
    DecColorFormat,

    /// Encoder codec FourCC
    EncCodecId,
    /// Encoder maximum codec level
    EncMaxCodecLevel,
    /// Encoder B-frame support
    EncBiDirectionalPrediction,
    /// Encoder profile
    EncProfile,
    /// Encoder input memory type
    EncMemHandleType,
    /// Encoder frame width range
    EncWidth,
    /// Encoder frame height range
    EncHeight,
    /// Encoder input color format
    EncColorFormat,

    /// Filter FourCC
    VppFilterFourCC,
    /// Filter latency in frames
    VppMaxDelayInFrames,
    /// Filter memory type
    VppMemHandleType,
    /// Filter frame width range
    VppWidth,
    /// Filter frame height range
    VppHeight,
    /// Filter input color format
    VppInFormat,
    /// Filter output color format
    VppOutFormat,

    /// Type of the device handle passed to the implementation
    SpecialHandleType,
    /// Opaque device handle passed to the implementation
    SpecialHandle,
    /// DXGI adapter index (Windows only)
    SpecialDxgiAdapterIndex,

    /// Function the implementation must export
    FunctionName,
}

/// Number of properties in the schema.
pub const PROPERTY_COUNT: usize = PropertyId::ALL.len();

impl PropertyId {
    /// Every property, ordered by index.
    pub const ALL: [PropertyId; 38] = [
        PropertyId::Impl,
        PropertyId::AccelerationMode,
        PropertyId::ApiVersion,
        PropertyId::ApiVersionMajor,
        PropertyId::ApiVersionMinor,
        PropertyId::ImplName,
        PropertyId::License,
        PropertyId::Keywords,
        PropertyId::VendorId,
        PropertyId::VendorImplId,
        PropertyId::DeviceId,
        PropertyId::DeviceIdStr,
        PropertyId::DecCodecId,
        PropertyId::DecMaxCodecLevel,
        PropertyId::DecProfile,
        PropertyId::DecMemHandleType,
        PropertyId::DecWidth,
        PropertyId::DecHeight,
        PropertyId::DecColorFormat,
        PropertyId::EncCodecId,
        PropertyId::EncMaxCodecLevel,
        PropertyId::EncBiDirectionalPrediction,
        PropertyId::EncProfile,
        PropertyId::EncMemHandleType,
        PropertyId::EncWidth,
        PropertyId::EncHeight,
        PropertyId::EncColorFormat,
        PropertyId::VppFilterFourCC,
        PropertyId::VppMaxDelayInFrames,
        PropertyId::VppMemHandleType,
        PropertyId::VppWidth,
        PropertyId::VppHeight,
        PropertyId::VppInFormat,
        PropertyId::VppOutFormat,
        PropertyId::SpecialHandleType,
        PropertyId::SpecialHandle,
        PropertyId::SpecialDxgiAdapterIndex,
        PropertyId::FunctionName,
    ];

    /// Stable schema index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a property by schema index.
    pub fn from_index(index: usize) -> Option<PropertyId> {
        Self::ALL.get(index).copied()
    }

    /// Declared storage kind.
    pub fn kind(self) -> ValueKind {
        use PropertyId::*;

        match self {
            ApiVersionMajor | ApiVersionMinor | DeviceId | DecMaxCodecLevel | EncMaxCodecLevel
            | EncBiDirectionalPrediction | VppMaxDelayInFrames => ValueKind::U16,

            Impl | AccelerationMode | ApiVersion | VendorId | VendorImplId | DecCodecId
            | DecProfile | DecMemHandleType | DecColorFormat | EncCodecId | EncProfile
            | EncMemHandleType | EncColorFormat | VppFilterFourCC | VppMemHandleType
            | VppInFormat | VppOutFormat | SpecialHandleType | SpecialDxgiAdapterIndex => {
                ValueKind::U32
            }

            DecWidth | DecHeight | EncWidth | EncHeight | VppWidth | VppHeight => ValueKind::Range,

            ImplName | License | Keywords | DeviceIdStr | FunctionName => ValueKind::Text,

            SpecialHandle => ValueKind::Handle,
        }
    }

    /// Declared wire type.
    pub fn scalar_type(self) -> ScalarType {
        self.kind().scalar_type()
    }

    /// Group the property is evaluated with.
    pub fn category(self) -> PropertyCategory {
        use PropertyId::*;

        match self {
            Impl | AccelerationMode | ApiVersion | ApiVersionMajor | ApiVersionMinor | ImplName
            | License | Keywords | VendorId | VendorImplId | DeviceId | DeviceIdStr => {
                PropertyCategory::General
            }
            DecCodecId | DecMaxCodecLevel | DecProfile | DecMemHandleType | DecWidth
            | DecHeight | DecColorFormat => PropertyCategory::Decode,
            EncCodecId | EncMaxCodecLevel | EncBiDirectionalPrediction | EncProfile
            | EncMemHandleType | EncWidth | EncHeight | EncColorFormat => PropertyCategory::Encode,
            VppFilterFourCC | VppMaxDelayInFrames | VppMemHandleType | VppWidth | VppHeight
            | VppInFormat | VppOutFormat => PropertyCategory::Filter,
            SpecialHandleType | SpecialHandle | SpecialDxgiAdapterIndex => {
                PropertyCategory::Special
            }
            FunctionName => PropertyCategory::Function,
        }
    }

    /// Human-readable name, matching the leaf segment of its property path.
    pub fn name(self) -> &'static str {
        use PropertyId::*;

        match self {
            Impl => "Impl",
            AccelerationMode => "AccelerationMode",
            ApiVersion => "ApiVersion.Version",
            ApiVersionMajor => "ApiVersion.Major",
            ApiVersionMinor => "ApiVersion.Minor",
            ImplName => "ImplName",
            License => "License",
            Keywords => "Keywords",
            VendorId => "VendorID",
            VendorImplId => "VendorImplID",
            DeviceId => "DeviceID",
            DeviceIdStr => "DeviceID(str)",
            DecCodecId => "decoder.CodecID",
            DecMaxCodecLevel => "decoder.MaxcodecLevel",
            DecProfile => "decoder.Profile",
            DecMemHandleType => "decoder.MemHandleType",
            DecWidth => "decoder.Width",
            DecHeight => "decoder.Height",
            DecColorFormat => "decoder.ColorFormat",
            EncCodecId => "encoder.CodecID",
            EncMaxCodecLevel => "encoder.MaxcodecLevel",
            EncBiDirectionalPrediction => "encoder.BiDirectionalPrediction",
            EncProfile => "encoder.Profile",
            EncMemHandleType => "encoder.MemHandleType",
            EncWidth => "encoder.Width",
            EncHeight => "encoder.Height",
            EncColorFormat => "encoder.ColorFormat",
            VppFilterFourCC => "filter.FilterFourCC",
            VppMaxDelayInFrames => "filter.MaxDelayInFrames",
            VppMemHandleType => "filter.MemHandleType",
            VppWidth => "filter.Width",
            VppHeight => "filter.Height",
            VppInFormat => "filter.InFormat",
            VppOutFormat => "filter.OutFormat",
            SpecialHandleType => "mfxHandleType",
            SpecialHandle => "mfxHDL",
            SpecialDxgiAdapterIndex => "DXGIAdapterIndex",
            FunctionName => "FunctionsName",
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Values
// =============================================================================

/// Borrowed payload of a pointer-typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtrData<'a> {
    /// Width/height range
    Range(&'a Range32U),
    /// Text (names, license, keywords, device id string, function name)
    Text(&'a str),
    /// Opaque device handle
    Handle(DeviceHandle),
}

impl PtrData<'_> {
    fn kind(&self) -> ValueKind {
        match self {
            PtrData::Range(_) => ValueKind::Range,
            PtrData::Text(_) => ValueKind::Text,
            PtrData::Handle(_) => ValueKind::Handle,
        }
    }
}

/// Caller-supplied property value.
///
/// `Ptr(None)` models a null reference; it is rejected for every property and
/// clears the targeted slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant<'a> {
    /// 16-bit value
    U16(u16),
    /// 32-bit value
    U32(u32),
    /// Reference to out-of-line data, `None` if null
    Ptr(Option<PtrData<'a>>),
}

impl<'a> Variant<'a> {
    /// Reference to a range.
    pub fn range(range: &'a Range32U) -> Self {
        Variant::Ptr(Some(PtrData::Range(range)))
    }

    /// Reference to a string.
    pub fn text(text: &'a str) -> Self {
        Variant::Ptr(Some(PtrData::Text(text)))
    }

    /// Opaque device handle.
    pub fn handle(handle: DeviceHandle) -> Self {
        Variant::Ptr(Some(PtrData::Handle(handle)))
    }

    /// Null reference.
    pub fn null() -> Self {
        Variant::Ptr(None)
    }

    /// Declared wire type of this value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Variant::U16(_) => ScalarType::U16,
            Variant::U32(_) => ScalarType::U32,
            Variant::Ptr(_) => ScalarType::Ptr,
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Variant::U16(_) => "u16",
            Variant::U32(_) => "u32",
            Variant::Ptr(None) => "null",
            Variant::Ptr(Some(data)) => data.kind().as_str(),
        }
    }
}

/// Value owned by a config context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// 16-bit value
    U16(u16),
    /// 32-bit value
    U32(u32),
    /// Owned copy of a range
    Range(Range32U),
    /// Owned copy of a string
    Text(String),
    /// Opaque device handle
    Handle(DeviceHandle),
}

impl PropertyValue {
    /// Storage kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::U16(_) => ValueKind::U16,
            PropertyValue::U32(_) => ValueKind::U32,
            PropertyValue::Range(_) => ValueKind::Range,
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::Handle(_) => ValueKind::Handle,
        }
    }

    /// Wire type of this value.
    pub fn scalar_type(&self) -> ScalarType {
        self.kind().scalar_type()
    }
}
