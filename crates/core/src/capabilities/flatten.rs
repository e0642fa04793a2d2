//! Descriptor flattening
//!
//! Expands each nested capability tree of an [`ImplDescription`] into a flat
//! list of leaf records, one per unique combination of its four levels. The
//! walk is odometer-style: the innermost index advances every step, and an
//! index that runs past its level resets to zero and carries into the level
//! above it. Empty branches are carried over immediately, so they produce no
//! records.

use serde::Serialize;

use super::constraints::Range32U;
use super::description::{DecoderDescription, EncoderDescription, ImplDescription, VppDescription};
use crate::{Error, Result};

// =============================================================================
// Flat Records
// =============================================================================

/// One decoder combination: codec × profile × memory type × color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DecodeConfig {
    /// Codec FourCC, from the codec level.
    pub codec_id: u32,
    pub max_codec_level: u16,
    pub profile: u32,
    /// Memory handle type, from the memory descriptor level.
    pub mem_handle_type: u32,
    /// Supported width range of the memory descriptor.
    pub width: Range32U,
    /// Supported height range of the memory descriptor.
    pub height: Range32U,
    /// Output color format FourCC, the innermost level.
    pub color_format: u32,
}

/// One encoder combination: codec × profile × memory type × color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EncodeConfig {
    /// Codec FourCC, from the codec level.
    pub codec_id: u32,
    pub max_codec_level: u16,
    /// Nonzero if the codec supports B-frames.
    pub bidirectional_prediction: u16,
    pub profile: u32,
    /// Memory handle type, from the memory descriptor level.
    pub mem_handle_type: u32,
    pub width: Range32U,
    pub height: Range32U,
    /// Input color format FourCC, the innermost level.
    pub color_format: u32,
}

/// One filter combination: filter × memory type × input format × output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FilterConfig {
    /// Filter FourCC, from the filter level.
    pub filter_fourcc: u32,
    /// Frames of latency the filter adds.
    pub max_delay_in_frames: u16,
    pub mem_handle_type: u32,
    pub width: Range32U,
    pub height: Range32U,
    /// Input color format FourCC.
    pub in_format: u32,
    /// Output color format FourCC, the innermost level.
    pub out_format: u32,
}

// =============================================================================
// Odometer
// =============================================================================

/// Index state for a four-level walk. Level 0 is the root list.
#[derive(Debug, Default)]
struct Odometer {
    digits: [usize; 4],
}

impl Odometer {
    fn digit(&self, level: usize) -> usize {
        self.digits[level]
    }

    /// Reset `level` and advance the level above it.
    fn carry(&mut self, level: usize) {
        self.digits[level] = 0;
        self.digits[level - 1] += 1;
    }

    /// Advance the innermost level.
    fn tick(&mut self) {
        self.digits[3] += 1;
    }
}

// =============================================================================
// Flattening
// =============================================================================

/// Flatten the decoder tree.
///
/// Returns `InvalidParam` if the tree has no complete combination.
pub fn flatten_decoders(dec: &DecoderDescription) -> Result<Vec<DecodeConfig>> {
    let mut odo = Odometer::default();
    let mut records = Vec::new();

    while let Some(codec) = dec.codecs.get(odo.digit(0)) {
        let Some(profile) = codec.profiles.get(odo.digit(1)) else {
            odo.carry(1);
            continue;
        };
        let Some(mem) = profile.mem_desc.get(odo.digit(2)) else {
            odo.carry(2);
            continue;
        };
        let Some(&color_format) = mem.color_formats.get(odo.digit(3)) else {
            odo.carry(3);
            continue;
        };

        records.push(DecodeConfig {
            codec_id: codec.codec_id,
            max_codec_level: codec.max_codec_level,
            profile: profile.profile,
            mem_handle_type: mem.mem_handle_type,
            width: mem.width,
            height: mem.height,
            color_format,
        });
        odo.tick();
    }

    finish("decoder", records)
}

/// Flatten the encoder tree.
///
/// Returns `InvalidParam` if the tree has no complete combination.
pub fn flatten_encoders(enc: &EncoderDescription) -> Result<Vec<EncodeConfig>> {
    let mut odo = Odometer::default();
    let mut records = Vec::new();

    while let Some(codec) = enc.codecs.get(odo.digit(0)) {
        let Some(profile) = codec.profiles.get(odo.digit(1)) else {
            odo.carry(1);
            continue;
        };
        let Some(mem) = profile.mem_desc.get(odo.digit(2)) else {
            odo.carry(2);
            continue;
        };
        let Some(&color_format) = mem.color_formats.get(odo.digit(3)) else {
            odo.carry(3);
            continue;
        };

        records.push(EncodeConfig {
            codec_id: codec.codec_id,
            max_codec_level: codec.max_codec_level,
            bidirectional_prediction: codec.bidirectional_prediction,
            profile: profile.profile,
            mem_handle_type: mem.mem_handle_type,
            width: mem.width,
            height: mem.height,
            color_format,
        });
        odo.tick();
    }

    finish("encoder", records)
}

/// Flatten the video processing tree.
///
/// Returns `InvalidParam` if the tree has no complete combination.
pub fn flatten_filters(vpp: &VppDescription) -> Result<Vec<FilterConfig>> {
    let mut odo = Odometer::default();
    let mut records = Vec::new();

    while let Some(filter) = vpp.filters.get(odo.digit(0)) {
        let Some(mem) = filter.mem_desc.get(odo.digit(1)) else {
            odo.carry(1);
            continue;
        };
        let Some(format) = mem.formats.get(odo.digit(2)) else {
            odo.carry(2);
            continue;
        };
        let Some(&out_format) = format.out_formats.get(odo.digit(3)) else {
            odo.carry(3);
            continue;
        };

        records.push(FilterConfig {
            filter_fourcc: filter.filter_fourcc,
            max_delay_in_frames: filter.max_delay_in_frames,
            mem_handle_type: mem.mem_handle_type,
            width: mem.width,
            height: mem.height,
            in_format: format.in_format,
            out_format,
        });
        odo.tick();
    }

    finish("filter", records)
}

fn finish<T>(category: &str, records: Vec<T>) -> Result<Vec<T>> {
    if records.is_empty() {
        return Err(Error::InvalidParam(format!(
            "{} description has no complete capability combination",
            category
        )));
    }
    tracing::trace!("Flattened {} description into {} record(s)", category, records.len());
    Ok(records)
}

/// Flattened records for all three categories of one description.
///
/// Each category keeps its own result: a category that cannot be flattened
/// only matters if a config context constrains it.
#[derive(Debug)]
pub struct FlatDescriptions {
    /// Decoder records, or the flattening error.
    pub dec: Result<Vec<DecodeConfig>>,
    /// Encoder records, or the flattening error.
    pub enc: Result<Vec<EncodeConfig>>,
    /// Video processing records, or the flattening error.
    pub vpp: Result<Vec<FilterConfig>>,
}

impl FlatDescriptions {
    /// Flatten every category of `desc`.
    pub fn from_description(desc: &ImplDescription) -> Self {
        Self {
            dec: flatten_decoders(&desc.dec),
            enc: flatten_encoders(&desc.enc),
            vpp: flatten_filters(&desc.vpp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::description::{
        DecCodec, DecMemDesc, DecProfile, EncCodec, EncMemDesc, EncProfile, VppFilter, VppFormat,
        VppMemDesc,
    };
    use std::collections::HashSet;

    fn uniform_decoders(c: u32, p: u32, m: u32, f: u32) -> DecoderDescription {
        DecoderDescription {
            codecs: (0..c)
                .map(|codec| DecCodec {
                    codec_id: 100 + codec,
                    max_codec_level: 51,
                    profiles: (0..p)
                        .map(|profile| DecProfile {
                            profile: 200 + profile,
                            mem_desc: (0..m)
                                .map(|mem| DecMemDesc {
                                    mem_handle_type: 300 + mem,
                                    width: Range32U::new(64, 4096, 16),
                                    height: Range32U::new(64, 2304, 16),
                                    color_formats: (0..f).map(|fmt| 400 + fmt).collect(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn uniform_encoders(c: u32, p: u32, m: u32, f: u32) -> EncoderDescription {
        EncoderDescription {
            codecs: (0..c)
                .map(|codec| EncCodec {
                    codec_id: 100 + codec,
                    max_codec_level: 51,
                    bidirectional_prediction: 1,
                    profiles: (0..p)
                        .map(|profile| EncProfile {
                            profile: 200 + profile,
                            mem_desc: (0..m)
                                .map(|mem| EncMemDesc {
                                    mem_handle_type: 300 + mem,
                                    width: Range32U::new(64, 4096, 16),
                                    height: Range32U::new(64, 2304, 16),
                                    color_formats: (0..f).map(|fmt| 400 + fmt).collect(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn uniform_filters(fl: u32, m: u32, i: u32, o: u32) -> VppDescription {
        VppDescription {
            filters: (0..fl)
                .map(|filter| VppFilter {
                    filter_fourcc: 100 + filter,
                    max_delay_in_frames: 1,
                    mem_desc: (0..m)
                        .map(|mem| VppMemDesc {
                            mem_handle_type: 300 + mem,
                            width: Range32U::new(16, 16384, 1),
                            height: Range32U::new(16, 16384, 1),
                            formats: (0..i)
                                .map(|input| VppFormat {
                                    in_format: 400 + input,
                                    out_formats: (0..o).map(|output| 500 + output).collect(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_flatten_decoders_uniform_count() {
        let dec = uniform_decoders(3, 2, 2, 4);
        let records = flatten_decoders(&dec).unwrap();
        assert_eq!(records.len(), 3 * 2 * 2 * 4);

        let unique: HashSet<_> = records
            .iter()
            .map(|r| (r.codec_id, r.profile, r.mem_handle_type, r.color_format))
            .collect();
        assert_eq!(unique.len(), records.len());

        for r in &records {
            assert!((100..103).contains(&r.codec_id));
            assert!((200..202).contains(&r.profile));
            assert!((300..302).contains(&r.mem_handle_type));
            assert!((400..404).contains(&r.color_format));
        }
    }

    #[test]
    fn test_flatten_encoders_uniform_count() {
        let records = flatten_encoders(&uniform_encoders(2, 3, 2, 3)).unwrap();
        assert_eq!(records.len(), 2 * 3 * 2 * 3);

        let unique: HashSet<_> = records
            .iter()
            .map(|r| (r.codec_id, r.profile, r.mem_handle_type, r.color_format))
            .collect();
        assert_eq!(unique.len(), records.len());
        assert_eq!(
            (records[0].codec_id, records[0].color_format),
            (100, 400)
        );
        let last = records[records.len() - 1];
        assert_eq!(
            (last.codec_id, last.profile, last.mem_handle_type, last.color_format),
            (101, 202, 301, 402)
        );
    }

    #[test]
    fn test_flatten_filters_uniform_count() {
        let records = flatten_filters(&uniform_filters(3, 2, 2, 3)).unwrap();
        assert_eq!(records.len(), 3 * 2 * 2 * 3);

        let unique: HashSet<_> = records
            .iter()
            .map(|r| (r.filter_fourcc, r.mem_handle_type, r.in_format, r.out_format))
            .collect();
        assert_eq!(unique.len(), records.len());
        for r in &records {
            assert!((100..103).contains(&r.filter_fourcc));
            assert!((300..302).contains(&r.mem_handle_type));
            assert!((400..402).contains(&r.in_format));
            assert!((500..503).contains(&r.out_format));
        }
    }

    #[test]
    fn test_flatten_decoders_order_is_innermost_first() {
        let records = flatten_decoders(&uniform_decoders(2, 1, 1, 2)).unwrap();
        let order: Vec<_> = records.iter().map(|r| (r.codec_id, r.color_format)).collect();
        assert_eq!(order, vec![(100, 400), (100, 401), (101, 400), (101, 401)]);
    }

    #[test]
    fn test_flatten_skips_empty_branches() {
        let mut dec = uniform_decoders(2, 2, 1, 1);
        // first codec: drop all formats of its first profile
        dec.codecs[0].profiles[0].mem_desc[0].color_formats.clear();
        // second codec: no profiles at all
        dec.codecs[1].profiles.clear();

        let records = flatten_decoders(&dec).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codec_id, 100);
        assert_eq!(records[0].profile, 201);
    }

    #[test]
    fn test_flatten_empty_tree_is_invalid() {
        assert!(matches!(
            flatten_decoders(&DecoderDescription::default()),
            Err(Error::InvalidParam(_))
        ));

        let mut dec = uniform_decoders(2, 1, 1, 1);
        for codec in &mut dec.codecs {
            codec.profiles[0].mem_desc.clear();
        }
        assert!(matches!(flatten_decoders(&dec), Err(Error::InvalidParam(_))));
    }

    #[test]
    fn test_flatten_encoders_carries_codec_fields() {
        let enc = EncoderDescription {
            codecs: vec![EncCodec {
                codec_id: 7,
                max_codec_level: 62,
                bidirectional_prediction: 1,
                profiles: vec![EncProfile {
                    profile: 1,
                    mem_desc: vec![
                        EncMemDesc {
                            mem_handle_type: 1,
                            width: Range32U::new(64, 8192, 8),
                            height: Range32U::new(64, 8192, 8),
                            color_formats: vec![10, 11],
                        },
                        EncMemDesc {
                            mem_handle_type: 2,
                            width: Range32U::new(64, 4096, 8),
                            height: Range32U::new(64, 4096, 8),
                            color_formats: vec![10],
                        },
                    ],
                }],
            }],
        };

        let records = flatten_encoders(&enc).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.codec_id == 7 && r.bidirectional_prediction == 1 && r.max_codec_level == 62));
        assert_eq!(records[2].mem_handle_type, 2);
        assert_eq!(records[2].width.max, 4096);
    }

    #[test]
    fn test_flatten_filters_in_out_pairs() {
        let vpp = VppDescription {
            filters: vec![VppFilter {
                filter_fourcc: 5,
                max_delay_in_frames: 1,
                mem_desc: vec![VppMemDesc {
                    mem_handle_type: 1,
                    width: Range32U::new(16, 16384, 1),
                    height: Range32U::new(16, 16384, 1),
                    formats: vec![
                        VppFormat {
                            in_format: 20,
                            out_formats: vec![30, 31, 32],
                        },
                        VppFormat {
                            in_format: 21,
                            out_formats: vec![],
                        },
                        VppFormat {
                            in_format: 22,
                            out_formats: vec![30],
                        },
                    ],
                }],
            }],
        };

        let records = flatten_filters(&vpp).unwrap();
        let pairs: Vec<_> = records.iter().map(|r| (r.in_format, r.out_format)).collect();
        assert_eq!(pairs, vec![(20, 30), (20, 31), (20, 32), (22, 30)]);
    }

    #[test]
    fn test_flat_descriptions_keep_per_category_results() {
        let desc = ImplDescription {
            dec: uniform_decoders(1, 1, 1, 1),
            ..Default::default()
        };
        let flat = FlatDescriptions::from_description(&desc);
        assert_eq!(flat.dec.as_ref().map(Vec::len).ok(), Some(1));
        assert!(flat.enc.is_err());
        assert!(flat.vpp.is_err());
    }
}
