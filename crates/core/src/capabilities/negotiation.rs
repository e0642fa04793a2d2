//! Negotiation driver
//!
//! [`validate`] decides whether one candidate implementation satisfies every
//! config context, and collects the special values the caller needs to finish
//! initializing the accepted implementation.
//!
//! # Algorithm
//!
//! 1. Flatten the descriptor categories once (skipped for legacy MSDK
//!    implementations, which publish no category descriptors).
//! 2. Evaluate each context on its own: the general check, then every
//!    category the context constrains. Constraints are never merged across
//!    contexts, so two contexts asking for different codecs both have to be
//!    satisfied by the same implementation.
//! 3. While walking the contexts, fold special values into [`SpecialConfig`]
//!    (later contexts overwrite earlier ones), collect the requested API
//!    version and the required function names.
//! 4. Gate on the API version once both halves are known.
//! 5. Check that every required function is implemented.

use serde::{Deserialize, Serialize};

use super::constraints::{DeviceHandle, PropertyCategory, PropertyId};
use super::context::ConfigContext;
use super::description::{ApiVersion, ImplDescription, ImplementedFunctions};
use super::flatten::FlatDescriptions;
use super::validation::{check_decode, check_encode, check_filter, check_general};
use crate::{Error, Result};

// =============================================================================
// Library Kind
// =============================================================================

/// Kind of library a candidate was loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    /// Fully descriptive implementation
    #[default]
    Vpl,
    /// Legacy compatibility-mode implementation without category descriptors
    LegacyMsdk,
}

// =============================================================================
// Special Config
// =============================================================================

/// Non-filtering values extracted from the config contexts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecialConfig {
    /// Type of the device handle the caller will pass in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_handle_type: Option<u32>,
    /// Opaque device handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_handle: Option<DeviceHandle>,
    /// DXGI adapter index (Windows only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dxgi_adapter_index: Option<u32>,
    /// Requested acceleration mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_mode: Option<u32>,
    /// Requested API version, set only when the version gate applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<ApiVersion>,
}

impl SpecialConfig {
    /// Overwrite each field that `ctx` sets.
    fn absorb(&mut self, ctx: &ConfigContext) {
        if let Some(handle_type) = ctx.u32(PropertyId::SpecialHandleType) {
            self.device_handle_type = Some(handle_type);
        }
        if let Some(handle) = ctx.handle(PropertyId::SpecialHandle) {
            self.device_handle = Some(handle);
        }
        if let Some(index) = ctx.u32(PropertyId::SpecialDxgiAdapterIndex) {
            self.dxgi_adapter_index = Some(index);
        }
        if let Some(mode) = ctx.u32(PropertyId::AccelerationMode) {
            self.acceleration_mode = Some(mode);
        }
    }
}

/// API version halves requested so far.
#[derive(Debug, Default)]
struct RequestedVersion {
    major: Option<u16>,
    minor: Option<u16>,
}

impl RequestedVersion {
    /// A combined version sets both halves; otherwise each split half that
    /// `ctx` sets replaces the one seen before.
    fn absorb(&mut self, ctx: &ConfigContext) {
        if let Some(packed) = ctx.u32(PropertyId::ApiVersion) {
            let version = ApiVersion::from_packed(packed);
            self.major = Some(version.major);
            self.minor = Some(version.minor);
            return;
        }
        if let Some(major) = ctx.u16(PropertyId::ApiVersionMajor) {
            self.major = Some(major);
        }
        if let Some(minor) = ctx.u16(PropertyId::ApiVersionMinor) {
            self.minor = Some(minor);
        }
    }

    fn resolved(&self) -> Option<ApiVersion> {
        Some(ApiVersion::new(self.major?, self.minor?))
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Decide whether `desc` satisfies every context in `contexts`.
///
/// Returns the folded [`SpecialConfig`] on acceptance and
/// `Err(Error::Unsupported)` with the first rejection reason otherwise.
/// An empty context list accepts any candidate.
pub fn validate(
    desc: &ImplDescription,
    functions: Option<&ImplementedFunctions>,
    contexts: &[ConfigContext],
    library: LibraryKind,
) -> Result<SpecialConfig> {
    let flat = match library {
        LibraryKind::Vpl => Some(FlatDescriptions::from_description(desc)),
        LibraryKind::LegacyMsdk => None,
    };

    let mut special = SpecialConfig::default();
    let mut version = RequestedVersion::default();
    let mut required: Vec<&str> = Vec::new();
    let mut rejection: Option<Error> = None;

    for (index, ctx) in contexts.iter().enumerate() {
        special.absorb(ctx);
        version.absorb(ctx);
        if let Some(name) = ctx.required_function() {
            required.push(name);
        }

        if rejection.is_none() {
            if let Err(err) = check_context(ctx, desc, flat.as_ref()) {
                tracing::debug!(
                    "Config {} rejects implementation '{}': {}",
                    index,
                    desc.impl_name,
                    err
                );
                rejection = Some(err);
            }
        }
    }

    if let Some(err) = rejection {
        return Err(err);
    }

    if let Some(requested) = version.resolved() {
        if desc.api_version < requested {
            tracing::debug!(
                "Implementation '{}' supports API {}, {} requested",
                desc.impl_name,
                desc.api_version,
                requested
            );
            return Err(Error::Unsupported(format!(
                "API version {} is lower than requested {}",
                desc.api_version, requested
            )));
        }
        special.api_version = Some(requested);
    }

    if !required.is_empty() {
        let Some(functions) = functions else {
            return Err(Error::Unsupported(format!(
                "{} required function(s) but no implemented function list",
                required.len()
            )));
        };
        if let Some(missing) = required.iter().find(|name| !functions.contains(name)) {
            tracing::debug!(
                "Implementation '{}' does not implement {}",
                desc.impl_name,
                missing
            );
            return Err(Error::Unsupported(format!(
                "function {} is not implemented",
                missing
            )));
        }
    }

    Ok(special)
}

/// Run the general check and each constrained category check for one context.
///
/// `flat` is `None` for legacy implementations, which skip category checks.
fn check_context(
    ctx: &ConfigContext,
    desc: &ImplDescription,
    flat: Option<&FlatDescriptions>,
) -> Result<()> {
    check_general(ctx, desc)?;

    let Some(flat) = flat else {
        return Ok(());
    };

    if ctx.constrains(PropertyCategory::Decode) {
        check_decode(ctx, flattened(&flat.dec)?)?;
    }
    if ctx.constrains(PropertyCategory::Encode) {
        check_encode(ctx, flattened(&flat.enc)?)?;
    }
    if ctx.constrains(PropertyCategory::Filter) {
        check_filter(ctx, flattened(&flat.vpp)?)?;
    }
    Ok(())
}

/// Records of a category, or `Unsupported` if the category could not be
/// flattened.
fn flattened<T>(records: &Result<Vec<T>>) -> Result<&[T]> {
    match records {
        Ok(records) => Ok(records.as_slice()),
        Err(err) => Err(Error::Unsupported(err.to_string())),
    }
}
