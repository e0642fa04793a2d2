//! Config contexts
//!
//! A [`ConfigContext`] is one caller-built bag of property constraints. Each
//! schema entry has one slot, unset until a setter stores a value in it.
//! Pointer-typed values are deep-copied, so a context never borrows from the
//! buffers it was filled from.

use super::constraints::{
    DeviceHandle, PropertyCategory, PropertyId, PropertyValue, PtrData, Range32U, ValueKind,
    Variant, PROPERTY_COUNT,
};
use super::resolver::resolve_property;
use crate::{Error, Result};

/// Caller-owned set of property constraints.
///
/// # Example
///
/// ```rust
/// use mediadispatch_core::capabilities::{constants::codec, ConfigContext, PropertyId, Variant};
///
/// let mut cfg = ConfigContext::new();
/// cfg.set_filter_property(
///     "mfxImplDescription.mfxDecoderDescription.decoder.CodecID",
///     Variant::U32(codec::HEVC),
/// )
/// .unwrap();
///
/// assert_eq!(cfg.u32(PropertyId::DecCodecId), Some(codec::HEVC));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    props: [Option<PropertyValue>; PROPERTY_COUNT],
}

impl Default for ConfigContext {
    fn default() -> Self {
        Self {
            props: std::array::from_fn(|_| None),
        }
    }
}

impl ConfigContext {
    /// Create a context with every property unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `path` and store `value` in the matching slot.
    ///
    /// Returns `NotFound` for unknown paths, `TypeMismatch` when the value's
    /// type disagrees with the property, and `NullPointer` for null
    /// references.
    pub fn set_filter_property(&mut self, path: &str, value: Variant<'_>) -> Result<()> {
        let id = resolve_property(path, value.scalar_type())?;
        self.set_property(id, value)
    }

    /// Store `value` in the slot with schema index `index`.
    pub fn set_property_at(&mut self, index: usize, value: Variant<'_>) -> Result<()> {
        let id = PropertyId::from_index(index)
            .ok_or_else(|| Error::NotFound(format!("no property with index {}", index)))?;
        self.set_property(id, value)
    }

    /// Store `value` in the slot for `id`, replacing any previous value.
    pub fn set_property(&mut self, id: PropertyId, value: Variant<'_>) -> Result<()> {
        let kind = id.kind();
        if value.scalar_type() != kind.scalar_type() {
            return Err(Error::TypeMismatch {
                property: id,
                expected: kind.scalar_type().as_str(),
                actual: value.scalar_type().as_str(),
            });
        }

        let stored = match (kind, value) {
            (ValueKind::U16, Variant::U16(v)) => PropertyValue::U16(v),
            (ValueKind::U32, Variant::U32(v)) => PropertyValue::U32(v),
            (_, Variant::Ptr(None)) => {
                // never leave a stale value behind a rejected null
                self.props[id.index()] = None;
                return Err(Error::NullPointer(id));
            }
            (ValueKind::Range, Variant::Ptr(Some(PtrData::Range(range)))) => {
                PropertyValue::Range(*range)
            }
            (ValueKind::Text, Variant::Ptr(Some(PtrData::Text(text)))) => {
                PropertyValue::Text(text.to_owned())
            }
            (ValueKind::Handle, Variant::Ptr(Some(PtrData::Handle(handle)))) => {
                PropertyValue::Handle(handle)
            }
            (kind, value) => {
                return Err(Error::TypeMismatch {
                    property: id,
                    expected: kind.as_str(),
                    actual: value.describe(),
                })
            }
        };

        self.props[id.index()] = Some(stored);
        Ok(())
    }

    /// Reset a slot to unset.
    pub fn clear(&mut self, id: PropertyId) {
        self.props[id.index()] = None;
    }

    /// Stored value for `id`, if set.
    pub fn get(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.props[id.index()].as_ref()
    }

    /// Check whether `id` has a value.
    pub fn is_set(&self, id: PropertyId) -> bool {
        self.props[id.index()].is_some()
    }

    /// Stored `u16` value for `id`.
    pub fn u16(&self, id: PropertyId) -> Option<u16> {
        match self.get(id) {
            Some(PropertyValue::U16(v)) => Some(*v),
            _ => None,
        }
    }

    /// Stored `u32` value for `id`.
    pub fn u32(&self, id: PropertyId) -> Option<u32> {
        match self.get(id) {
            Some(PropertyValue::U32(v)) => Some(*v),
            _ => None,
        }
    }

    /// Stored range for `id`.
    pub fn range(&self, id: PropertyId) -> Option<&Range32U> {
        match self.get(id) {
            Some(PropertyValue::Range(r)) => Some(r),
            _ => None,
        }
    }

    /// Stored text for `id`.
    pub fn text(&self, id: PropertyId) -> Option<&str> {
        match self.get(id) {
            Some(PropertyValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Stored device handle for `id`.
    pub fn handle(&self, id: PropertyId) -> Option<DeviceHandle> {
        match self.get(id) {
            Some(PropertyValue::Handle(h)) => Some(*h),
            _ => None,
        }
    }

    /// Function name this context requires the implementation to export.
    pub fn required_function(&self) -> Option<&str> {
        self.text(PropertyId::FunctionName)
    }

    /// Check whether any property of `category` is set.
    pub fn constrains(&self, category: PropertyCategory) -> bool {
        self.iter().any(|(id, _)| id.category() == category)
    }

    /// Iterate over the set properties in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &PropertyValue)> + '_ {
        PropertyId::ALL
            .iter()
            .zip(self.props.iter())
            .filter_map(|(id, slot)| slot.as_ref().map(|value| (*id, value)))
    }

    /// Number of set properties.
    pub fn len(&self) -> usize {
        self.props.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
