//! Composite device identifier parsing
//!
//! Implementations report their device as `"<hex device id>"` or
//! `"<hex device id>/<decimal adapter index>"`, e.g. `"46a6/0"`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DEVICE_ID_WITH_ADAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]+)/([0-9]+)$").expect("device id pattern is valid")
});

static DEVICE_ID_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]+$").expect("device id pattern is valid"));

/// Parsed device identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceId {
    /// PCI device id
    pub device_id: u32,
    /// Adapter index, `None` if the text did not carry one
    pub adapter_index: Option<u32>,
}

/// Parse a device identifier string.
///
/// Returns `None` if the text matches neither form or a number does not fit
/// in 32 bits.
///
/// ```rust
/// use mediadispatch_core::capabilities::parse_device_id;
///
/// let dev = parse_device_id("1A2B/2").unwrap();
/// assert_eq!(dev.device_id, 0x1A2B);
/// assert_eq!(dev.adapter_index, Some(2));
///
/// assert!(parse_device_id("xyz").is_none());
/// ```
pub fn parse_device_id(text: &str) -> Option<DeviceId> {
    if let Some(caps) = DEVICE_ID_WITH_ADAPTER.captures(text) {
        let device_id = u32::from_str_radix(&caps[1], 16).ok()?;
        let adapter_index = caps[2].parse::<u32>().ok()?;
        return Some(DeviceId {
            device_id,
            adapter_index: Some(adapter_index),
        });
    }

    if DEVICE_ID_ONLY.is_match(text) {
        let device_id = u32::from_str_radix(text, 16).ok()?;
        return Some(DeviceId {
            device_id,
            adapter_index: None,
        });
    }

    None
}
