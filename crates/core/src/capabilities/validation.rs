//! Compatibility checks between a config context and a candidate description
//!
//! [`check_general`] covers the top-level identity and device properties.
//! The category checks ([`check_decode`], [`check_encode`], [`check_filter`])
//! accept a candidate if at least one flattened record satisfies every
//! constraint the context sets for that category.
//!
//! Matching rules:
//!
//! - integer properties: exact match
//! - width/height: the requested range must fit inside the record's range
//!   (see [`Range32U::subsumes`])
//! - license/keywords: every comma-separated token of the request must appear
//!   among the description's tokens
//! - acceleration mode: membership in the description's mode list, or an
//!   exact match against its default mode if no list is reported
//! - numeric device id: the description's id must follow the
//!   [`parse_device_id`] grammar exactly; a `0x` prefix or trailing text makes
//!   it malformed, which rejects the candidate
//!
//! Every check returns `Err(Error::Unsupported)` with the reason when the
//! candidate does not fit.

use super::constraints::{PropertyCategory, PropertyId, Range32U};
use super::context::ConfigContext;
use super::description::ImplDescription;
use super::device_id::parse_device_id;
use super::flatten::{DecodeConfig, EncodeConfig, FilterConfig};
use crate::{Error, Result};

// =============================================================================
// Field Matching
// =============================================================================

/// `true` if the constraint is unset or equal to `actual`.
fn accepts<T: PartialEq>(requested: Option<T>, actual: T) -> bool {
    requested.map_or(true, |value| value == actual)
}

/// `true` if the range constraint is unset or fits inside `capability`.
fn accepts_range(requested: Option<&Range32U>, capability: &Range32U) -> bool {
    requested.map_or(true, |range| capability.subsumes(range))
}

/// Split a comma-separated token list. Empty input has no tokens, and a
/// single trailing comma does not add an empty token, so `","` is one empty
/// token.
fn tokens(list: &str) -> impl Iterator<Item = &str> {
    let present = !list.is_empty();
    let body = list.strip_suffix(',').unwrap_or(list);
    body.split(',').filter(move |_| present)
}

/// Check that every token of `requested` appears in `available`.
///
/// Order and duplicates are ignored.
///
/// ```rust
/// use mediadispatch_core::capabilities::validation::tokens_subsumed;
///
/// assert!(tokens_subsumed("MIT,Apache,BSD", "MIT,Apache"));
/// assert!(!tokens_subsumed("MIT", "MIT,Apache"));
/// ```
pub fn tokens_subsumed(available: &str, requested: &str) -> bool {
    let available: Vec<&str> = tokens(available).collect();
    tokens(requested).all(|token| available.contains(&token))
}

// =============================================================================
// General Check
// =============================================================================

/// Check the top-level (non-category) constraints of `ctx` against `desc`.
///
/// API version is not checked here: its halves may come from different
/// contexts, so the negotiation driver checks it once all contexts are read.
pub fn check_general(ctx: &ConfigContext, desc: &ImplDescription) -> Result<()> {
    if !accepts(ctx.u32(PropertyId::Impl), desc.impl_type) {
        return Err(unsupported(PropertyId::Impl, desc.impl_type));
    }
    if !accepts(ctx.u32(PropertyId::VendorId), desc.vendor_id) {
        return Err(unsupported(PropertyId::VendorId, desc.vendor_id));
    }
    if !accepts(ctx.u32(PropertyId::VendorImplId), desc.vendor_impl_id) {
        return Err(unsupported(PropertyId::VendorImplId, desc.vendor_impl_id));
    }

    if let Some(mode) = ctx.u32(PropertyId::AccelerationMode) {
        let supported = if desc.acceleration_modes.is_empty() {
            mode == desc.acceleration_mode
        } else {
            desc.acceleration_modes.contains(&mode)
        };
        if !supported {
            return Err(Error::Unsupported(format!(
                "acceleration mode {:#06x} is not supported",
                mode
            )));
        }
    }

    if let Some(name) = ctx.text(PropertyId::ImplName) {
        if name != desc.impl_name {
            return Err(Error::Unsupported(format!(
                "implementation name '{}' does not match '{}'",
                desc.impl_name, name
            )));
        }
    }

    if let Some(license) = ctx.text(PropertyId::License) {
        if !tokens_subsumed(&desc.license, license) {
            return Err(Error::Unsupported(format!(
                "license '{}' does not include '{}'",
                desc.license, license
            )));
        }
    }

    if let Some(keywords) = ctx.text(PropertyId::Keywords) {
        if !tokens_subsumed(&desc.keywords, keywords) {
            return Err(Error::Unsupported(format!(
                "keywords '{}' do not include '{}'",
                desc.keywords, keywords
            )));
        }
    }

    if let Some(requested) = ctx.u16(PropertyId::DeviceId) {
        let Some(device) = parse_device_id(&desc.device.device_id) else {
            tracing::warn!(
                "Implementation '{}' reports malformed device id '{}'",
                desc.impl_name,
                desc.device.device_id
            );
            return Err(Error::Unsupported(format!(
                "malformed device id '{}'",
                desc.device.device_id
            )));
        };
        if device.device_id != u32::from(requested) {
            return Err(Error::Unsupported(format!(
                "device id {:#x} does not match {:#x}",
                device.device_id, requested
            )));
        }
    }

    if let Some(requested) = ctx.text(PropertyId::DeviceIdStr) {
        if requested != desc.device.device_id {
            return Err(Error::Unsupported(format!(
                "device id '{}' does not match '{}'",
                desc.device.device_id, requested
            )));
        }
    }

    Ok(())
}

fn unsupported(id: PropertyId, actual: u32) -> Error {
    Error::Unsupported(format!("{} is {:#x}, which does not match the request", id, actual))
}

// =============================================================================
// Category Checks
// =============================================================================

/// A flattened record that can be matched against a config context.
pub trait FlatRecord {
    /// Category whose constraints apply to this record.
    const CATEGORY: PropertyCategory;

    /// Check every constraint of `Self::CATEGORY` set in `ctx`.
    fn satisfies(&self, ctx: &ConfigContext) -> bool;
}

impl FlatRecord for DecodeConfig {
    const CATEGORY: PropertyCategory = PropertyCategory::Decode;

    fn satisfies(&self, ctx: &ConfigContext) -> bool {
        accepts(ctx.u32(PropertyId::DecCodecId), self.codec_id)
            && accepts(ctx.u16(PropertyId::DecMaxCodecLevel), self.max_codec_level)
            && accepts(ctx.u32(PropertyId::DecProfile), self.profile)
            && accepts(ctx.u32(PropertyId::DecMemHandleType), self.mem_handle_type)
            && accepts(ctx.u32(PropertyId::DecColorFormat), self.color_format)
            && accepts_range(ctx.range(PropertyId::DecWidth), &self.width)
            && accepts_range(ctx.range(PropertyId::DecHeight), &self.height)
    }
}

impl FlatRecord for EncodeConfig {
    const CATEGORY: PropertyCategory = PropertyCategory::Encode;

    fn satisfies(&self, ctx: &ConfigContext) -> bool {
        accepts(ctx.u32(PropertyId::EncCodecId), self.codec_id)
            && accepts(ctx.u16(PropertyId::EncMaxCodecLevel), self.max_codec_level)
            && accepts(
                ctx.u16(PropertyId::EncBiDirectionalPrediction),
                self.bidirectional_prediction,
            )
            && accepts(ctx.u32(PropertyId::EncProfile), self.profile)
            && accepts(ctx.u32(PropertyId::EncMemHandleType), self.mem_handle_type)
            && accepts(ctx.u32(PropertyId::EncColorFormat), self.color_format)
            && accepts_range(ctx.range(PropertyId::EncWidth), &self.width)
            && accepts_range(ctx.range(PropertyId::EncHeight), &self.height)
    }
}

impl FlatRecord for FilterConfig {
    const CATEGORY: PropertyCategory = PropertyCategory::Filter;

    fn satisfies(&self, ctx: &ConfigContext) -> bool {
        accepts(ctx.u32(PropertyId::VppFilterFourCC), self.filter_fourcc)
            && accepts(ctx.u16(PropertyId::VppMaxDelayInFrames), self.max_delay_in_frames)
            && accepts(ctx.u32(PropertyId::VppMemHandleType), self.mem_handle_type)
            && accepts(ctx.u32(PropertyId::VppInFormat), self.in_format)
            && accepts(ctx.u32(PropertyId::VppOutFormat), self.out_format)
            && accepts_range(ctx.range(PropertyId::VppWidth), &self.width)
            && accepts_range(ctx.range(PropertyId::VppHeight), &self.height)
    }
}

/// Accept if any record satisfies every constraint of its category.
pub fn check_category<R: FlatRecord>(ctx: &ConfigContext, records: &[R]) -> Result<()> {
    if records.iter().any(|record| record.satisfies(ctx)) {
        Ok(())
    } else {
        Err(Error::Unsupported(format!(
            "no {:?} capability of {} satisfies the request",
            R::CATEGORY,
            records.len()
        )))
    }
}

/// Check decoder constraints against the flattened decoder records.
pub fn check_decode(ctx: &ConfigContext, records: &[DecodeConfig]) -> Result<()> {
    check_category(ctx, records)
}

/// Check encoder constraints against the flattened encoder records.
pub fn check_encode(ctx: &ConfigContext, records: &[EncodeConfig]) -> Result<()> {
    check_category(ctx, records)
}

/// Check filter constraints against the flattened filter records.
pub fn check_filter(ctx: &ConfigContext, records: &[FilterConfig]) -> Result<()> {
    check_category(ctx, records)
}
