//! Negotiation manifest parsing
//!
//! A manifest captures one negotiation session in JSON or YAML: the config
//! contexts an application would build (as property path settings) and the
//! candidate implementations to filter.
//!
//! ```yaml
//! configs:
//!   - - path: mfxImplDescription.Impl
//!       u32: 2
//!     - path: mfxImplDescription.mfxDecoderDescription.decoder.CodecID
//!       fourcc: HEVC
//! candidates:
//!   - name: gpu
//!     kind: vpl
//!     description: { impl: 2 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::capabilities::constants::fourcc;
use crate::capabilities::{DeviceHandle, Range32U, Variant};
use crate::loader::{Candidate, Loader, Negotiated};
use crate::{Error, Result};

/// Typed value of one property setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValue {
    /// 16-bit value
    U16(u16),
    /// 32-bit value
    U32(u32),
    /// Four-character code, packed as a 32-bit value
    Fourcc(String),
    /// Width/height range
    Range(Range32U),
    /// String value
    Text(String),
    /// Opaque device handle
    Handle(usize),
}

impl SettingValue {
    /// Borrow this value as a setter argument.
    pub fn to_variant(&self) -> Result<Variant<'_>> {
        Ok(match self {
            SettingValue::U16(v) => Variant::U16(*v),
            SettingValue::U32(v) => Variant::U32(*v),
            SettingValue::Fourcc(code) => Variant::U32(parse_fourcc(code)?),
            SettingValue::Range(range) => Variant::range(range),
            SettingValue::Text(text) => Variant::text(text),
            SettingValue::Handle(handle) => Variant::handle(DeviceHandle(*handle)),
        })
    }
}

fn parse_fourcc(code: &str) -> Result<u32> {
    let bytes: &[u8; 4] = code.as_bytes().try_into().map_err(|_| {
        Error::InvalidManifest(format!("FourCC '{}' must be exactly 4 bytes", code))
    })?;
    Ok(fourcc(bytes))
}

/// One `path = value` entry of a config context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySetting {
    /// Property path, e.g. `mfxImplDescription.Impl`
    pub path: String,
    /// Value keyed by its type (`u16`, `u32`, `fourcc`, `range`, `text`, `handle`)
    #[serde(flatten)]
    pub value: SettingValue,
}

/// A negotiation session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiationManifest {
    /// Config contexts, each a list of settings applied in order
    #[serde(default)]
    pub configs: Vec<Vec<PropertySetting>>,
    /// Implementations to filter
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl NegotiationManifest {
    /// Parse a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a manifest file; `.yaml`/`.yml` files are read as YAML, anything
    /// else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        tracing::debug!("Loading negotiation manifest from {}", path.display());
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Build a loader holding one config context per entry of `configs`.
    ///
    /// Fails on the first setting the context rejects.
    pub fn build_loader(&self) -> Result<Loader> {
        let mut loader = Loader::new();

        for (index, settings) in self.configs.iter().enumerate() {
            let ctx = loader.create_config();
            for setting in settings {
                setting
                    .value
                    .to_variant()
                    .and_then(|value| ctx.set_filter_property(&setting.path, value))
                    .map_err(|e| {
                        Error::InvalidManifest(format!(
                            "config {} property '{}': {}",
                            index, setting.path, e
                        ))
                    })?;
            }
        }

        Ok(loader)
    }

    /// Build the loader and filter the manifest's candidates.
    pub fn negotiate(&self) -> Result<Vec<Negotiated>> {
        Ok(self.build_loader()?.filter(&self.candidates))
    }
}
