//! Property path resolution
//!
//! Maps a dotted property path onto a [`PropertyId`]. Paths mirror the
//! nesting of the implementation description:
//!
//! ```text
//! mfxImplDescription.mfxDecoderDescription.decoder.decprofile.decmemdesc.ColorFormat
//! └─ root ──────────┘└─ section ─────────┘└─ codec ┘└ profile ┘└ memory ┘└ leaf ────┘
//! ```
//!
//! A handful of special paths (`mfxHandleType`, `mfxHDL`, `DXGIAdapterIndex`,
//! `mfxImplementedFunctions.FunctionsName`) live outside the description root.
//! This vocabulary is what applications write, so it is matched exactly,
//! including the singular/plural synonyms for color and output formats.
//!
//! # Example
//!
//! ```rust
//! use mediadispatch_core::capabilities::{resolve_property, PropertyId, ScalarType};
//!
//! let id = resolve_property(
//!     "mfxImplDescription.mfxDecoderDescription.decoder.CodecID",
//!     ScalarType::U32,
//! )
//! .unwrap();
//! assert_eq!(id, PropertyId::DecCodecId);
//! ```

use std::str::Split;

use super::constraints::{PropertyId, ScalarType};
use crate::{Error, Result};

/// Cursor over the dot-separated segments of a property path.
struct Segments<'a> {
    path: &'a str,
    parts: Split<'a, char>,
}

impl<'a> Segments<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            parts: path.split('.'),
        }
    }

    /// Next segment, or `""` once the path is exhausted.
    fn next(&mut self) -> &'a str {
        self.parts.next().unwrap_or("")
    }

    /// Accept `id` if nothing follows the current segment.
    fn leaf(mut self, id: PropertyId) -> Result<PropertyId> {
        match self.parts.next() {
            None => Ok(id),
            Some(extra) => Err(Error::NotFound(format!(
                "'{}': unexpected segment '{}' after {}",
                self.path, extra, id
            ))),
        }
    }

    fn unknown(&self, segment: &str) -> Error {
        if segment.is_empty() {
            Error::NotFound(format!("'{}': path ends before a property", self.path))
        } else {
            Error::NotFound(format!("'{}': unknown segment '{}'", self.path, segment))
        }
    }
}

/// Resolve a property path to its schema entry.
///
/// `value_type` is the wire type of the value about to be stored. It only
/// matters for `DeviceID`, which is routed to the numeric slot for integer
/// values and to the string slot for pointer values.
pub fn resolve_property(path: &str, value_type: ScalarType) -> Result<PropertyId> {
    let mut segs = Segments::new(path);

    let root = segs.next();
    match root {
        "mfxHandleType" => segs.leaf(PropertyId::SpecialHandleType),
        "mfxHDL" => segs.leaf(PropertyId::SpecialHandle),
        "DXGIAdapterIndex" => {
            if cfg!(windows) {
                segs.leaf(PropertyId::SpecialDxgiAdapterIndex)
            } else {
                Err(Error::NotFound(format!(
                    "'{}': adapter index is only available on Windows",
                    path
                )))
            }
        }
        "mfxImplementedFunctions" => match segs.next() {
            "FunctionsName" => segs.leaf(PropertyId::FunctionName),
            other => Err(segs.unknown(other)),
        },
        "mfxImplDescription" => resolve_description(segs, value_type),
        other => Err(segs.unknown(other)),
    }
}

fn resolve_description(mut segs: Segments<'_>, value_type: ScalarType) -> Result<PropertyId> {
    let id = match segs.next() {
        "Impl" => PropertyId::Impl,
        "AccelerationMode" => PropertyId::AccelerationMode,
        "VendorID" => PropertyId::VendorId,
        "VendorImplID" => PropertyId::VendorImplId,
        "ImplName" => PropertyId::ImplName,
        "License" => PropertyId::License,
        "Keywords" => PropertyId::Keywords,
        "ApiVersion" => match segs.next() {
            "Version" => PropertyId::ApiVersion,
            "Major" => PropertyId::ApiVersionMajor,
            "Minor" => PropertyId::ApiVersionMinor,
            other => return Err(segs.unknown(other)),
        },
        "mfxDeviceDescription" => return resolve_device(segs, value_type),
        "mfxDecoderDescription" => return resolve_decoder(segs),
        "mfxEncoderDescription" => return resolve_encoder(segs),
        "mfxVPPDescription" => return resolve_filter(segs),
        other => return Err(segs.unknown(other)),
    };
    segs.leaf(id)
}

fn resolve_device(mut segs: Segments<'_>, value_type: ScalarType) -> Result<PropertyId> {
    let mut next = segs.next();
    // older naming had an extra "device" level
    if next == "device" {
        next = segs.next();
    }

    match next {
        "DeviceID" if value_type == ScalarType::Ptr => segs.leaf(PropertyId::DeviceIdStr),
        "DeviceID" => segs.leaf(PropertyId::DeviceId),
        other => Err(segs.unknown(other)),
    }
}

fn resolve_decoder(mut segs: Segments<'_>) -> Result<PropertyId> {
    match segs.next() {
        "decoder" => {}
        other => return Err(segs.unknown(other)),
    }

    let id = match segs.next() {
        "CodecID" => PropertyId::DecCodecId,
        "MaxcodecLevel" => PropertyId::DecMaxCodecLevel,
        "decprofile" => match segs.next() {
            "Profile" => PropertyId::DecProfile,
            "decmemdesc" => match segs.next() {
                "MemHandleType" => PropertyId::DecMemHandleType,
                "Width" => PropertyId::DecWidth,
                "Height" => PropertyId::DecHeight,
                "ColorFormat" | "ColorFormats" => PropertyId::DecColorFormat,
                other => return Err(segs.unknown(other)),
            },
            other => return Err(segs.unknown(other)),
        },
        other => return Err(segs.unknown(other)),
    };
    segs.leaf(id)
}

fn resolve_encoder(mut segs: Segments<'_>) -> Result<PropertyId> {
    match segs.next() {
        "encoder" => {}
        other => return Err(segs.unknown(other)),
    }

    let id = match segs.next() {
        "CodecID" => PropertyId::EncCodecId,
        "MaxcodecLevel" => PropertyId::EncMaxCodecLevel,
        "BiDirectionalPrediction" => PropertyId::EncBiDirectionalPrediction,
        "encprofile" => match segs.next() {
            "Profile" => PropertyId::EncProfile,
            "encmemdesc" => match segs.next() {
                "MemHandleType" => PropertyId::EncMemHandleType,
                "Width" => PropertyId::EncWidth,
                "Height" => PropertyId::EncHeight,
                "ColorFormat" | "ColorFormats" => PropertyId::EncColorFormat,
                other => return Err(segs.unknown(other)),
            },
            other => return Err(segs.unknown(other)),
        },
        other => return Err(segs.unknown(other)),
    };
    segs.leaf(id)
}

fn resolve_filter(mut segs: Segments<'_>) -> Result<PropertyId> {
    match segs.next() {
        "filter" => {}
        other => return Err(segs.unknown(other)),
    }

    let id = match segs.next() {
        "FilterFourCC" => PropertyId::VppFilterFourCC,
        "MaxDelayInFrames" => PropertyId::VppMaxDelayInFrames,
        "memdesc" => match segs.next() {
            "MemHandleType" => PropertyId::VppMemHandleType,
            "Width" => PropertyId::VppWidth,
            "Height" => PropertyId::VppHeight,
            "format" => match segs.next() {
                "InFormat" => PropertyId::VppInFormat,
                "OutFormat" | "OutFormats" => PropertyId::VppOutFormat,
                other => return Err(segs.unknown(other)),
            },
            other => return Err(segs.unknown(other)),
        },
        other => return Err(segs.unknown(other)),
    };
    segs.leaf(id)
}
