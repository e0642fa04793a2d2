//! End-to-end negotiation through property paths
//!
//! Builds config contexts the way applications do (dotted paths plus typed
//! values) and runs them against realistic implementation descriptions.

use mediadispatch_core::capabilities::constants::{
    accel_mode, codec, color_format, filter, handle_type, impl_type, mem_type, vendor,
};
use mediadispatch_core::capabilities::{
    validate, ApiVersion, ConfigContext, DecCodec, DecMemDesc, DecProfile, DecoderDescription,
    DeviceDescription, DeviceHandle, EncCodec, EncMemDesc, EncProfile, EncoderDescription,
    ImplDescription, ImplementedFunctions, LibraryKind, Range32U, Variant, VppDescription,
    VppFilter, VppFormat, VppMemDesc,
};
use mediadispatch_core::Error;

const DEC_CODEC: &str = "mfxImplDescription.mfxDecoderDescription.decoder.CodecID";
const DEC_PROFILE: &str = "mfxImplDescription.mfxDecoderDescription.decoder.decprofile.Profile";
const DEC_WIDTH: &str =
    "mfxImplDescription.mfxDecoderDescription.decoder.decprofile.decmemdesc.Width";
const DEC_COLOR: &str =
    "mfxImplDescription.mfxDecoderDescription.decoder.decprofile.decmemdesc.ColorFormats";
const ENC_CODEC: &str = "mfxImplDescription.mfxEncoderDescription.encoder.CodecID";
const VPP_FILTER: &str = "mfxImplDescription.mfxVPPDescription.filter.FilterFourCC";
const VPP_OUT: &str =
    "mfxImplDescription.mfxVPPDescription.filter.memdesc.format.OutFormat";
const API_VERSION: &str = "mfxImplDescription.ApiVersion.Version";
const FUNCTION: &str = "mfxImplementedFunctions.FunctionsName";

fn gpu_description() -> ImplDescription {
    ImplDescription {
        impl_type: impl_type::HARDWARE,
        acceleration_mode: accel_mode::VIA_VAAPI,
        acceleration_modes: vec![accel_mode::VIA_VAAPI, accel_mode::VIA_VAAPI_DRM_RENDER_NODE],
        api_version: ApiVersion::new(2, 6),
        impl_name: "mfx-gen".to_string(),
        license: "MIT,Apache,BSD".to_string(),
        keywords: "GPU,HW".to_string(),
        vendor_id: vendor::INTEL,
        vendor_impl_id: 0,
        device: DeviceDescription {
            device_id: "46a6/0".to_string(),
            media_adapter_type: 1,
        },
        dec: DecoderDescription {
            codecs: vec![DecCodec {
                codec_id: codec::AVC,
                max_codec_level: 51,
                profiles: vec![
                    DecProfile {
                        profile: 66,
                        mem_desc: vec![DecMemDesc {
                            mem_handle_type: mem_type::VA_SURFACE,
                            width: Range32U::new(64, 4096, 2),
                            height: Range32U::new(64, 4096, 2),
                            color_formats: vec![color_format::NV12],
                        }],
                    },
                    DecProfile {
                        profile: 100,
                        mem_desc: vec![DecMemDesc {
                            mem_handle_type: mem_type::VA_SURFACE,
                            width: Range32U::new(64, 4096, 2),
                            height: Range32U::new(64, 4096, 2),
                            color_formats: vec![color_format::NV12, color_format::P010],
                        }],
                    },
                ],
            }],
        },
        enc: EncoderDescription {
            codecs: vec![EncCodec {
                codec_id: codec::HEVC,
                max_codec_level: 62,
                bidirectional_prediction: 1,
                profiles: vec![EncProfile {
                    profile: 1,
                    mem_desc: vec![EncMemDesc {
                        mem_handle_type: mem_type::VA_SURFACE,
                        width: Range32U::new(64, 8192, 8),
                        height: Range32U::new(64, 8192, 8),
                        color_formats: vec![color_format::NV12],
                    }],
                }],
            }],
        },
        vpp: VppDescription {
            filters: vec![VppFilter {
                filter_fourcc: filter::SCALING,
                max_delay_in_frames: 0,
                mem_desc: vec![VppMemDesc {
                    mem_handle_type: mem_type::VA_SURFACE,
                    width: Range32U::new(16, 16384, 1),
                    height: Range32U::new(16, 16384, 1),
                    formats: vec![VppFormat {
                        in_format: color_format::NV12,
                        out_formats: vec![color_format::NV12, color_format::RGB4],
                    }],
                }],
            }],
        },
    }
}

/// Route rejection reasons (`debug!`) to the test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("mediadispatch_core=debug"))
        .try_init();
}

fn config(settings: &[(&str, Variant<'_>)]) -> ConfigContext {
    init_tracing();
    let mut ctx = ConfigContext::new();
    for (path, value) in settings {
        ctx.set_filter_property(path, *value)
            .unwrap_or_else(|e| panic!("setting {} failed: {}", path, e));
    }
    ctx
}

fn accepts(desc: &ImplDescription, contexts: &[ConfigContext]) -> bool {
    init_tracing();
    validate(desc, None, contexts, LibraryKind::Vpl).is_ok()
}

#[test]
fn test_full_decode_request_is_accepted() {
    let width = Range32U::new(100, 1000, 2);
    let ctx = config(&[
        ("mfxImplDescription.Impl", Variant::U32(impl_type::HARDWARE)),
        ("mfxImplDescription.VendorID", Variant::U32(vendor::INTEL)),
        (DEC_CODEC, Variant::U32(codec::AVC)),
        (DEC_PROFILE, Variant::U32(100)),
        (DEC_WIDTH, Variant::range(&width)),
        (DEC_COLOR, Variant::U32(color_format::P010)),
    ]);

    assert!(accepts(&gpu_description(), &[ctx]));
}

#[test]
fn test_decode_combination_must_exist_in_one_record() {
    // P010 is only offered with profile 100
    let ctx = config(&[
        (DEC_PROFILE, Variant::U32(66)),
        (DEC_COLOR, Variant::U32(color_format::P010)),
    ]);
    assert!(!accepts(&gpu_description(), &[ctx]));
}

#[test]
fn test_range_subsumption_against_capability() {
    let request = Range32U::new(100, 1000, 2);
    let ctx = config(&[(DEC_WIDTH, Variant::range(&request))]);

    let mut desc = gpu_description();
    assert!(accepts(&desc, std::slice::from_ref(&ctx)));

    for profile in &mut desc.dec.codecs[0].profiles {
        profile.mem_desc[0].width = Range32U::new(64, 512, 2);
    }
    assert!(!accepts(&desc, &[ctx]));
}

#[test]
fn test_license_tokens() {
    let ctx = config(&[("mfxImplDescription.License", Variant::text("MIT,Apache"))]);

    let mut desc = gpu_description();
    assert!(accepts(&desc, std::slice::from_ref(&ctx)));

    desc.license = "MIT".to_string();
    assert!(!accepts(&desc, &[ctx]));
}

#[test]
fn test_each_context_must_pass_on_its_own() {
    let avc = config(&[(DEC_CODEC, Variant::U32(codec::AVC))]);
    let hevc = config(&[(DEC_CODEC, Variant::U32(codec::HEVC))]);

    let desc = gpu_description();
    assert!(accepts(&desc, &[avc.clone()]));
    assert!(!accepts(&desc, &[avc.clone(), hevc]));

    // contexts for different categories combine
    let encode = config(&[(ENC_CODEC, Variant::U32(codec::HEVC))]);
    let scale = config(&[
        (VPP_FILTER, Variant::U32(filter::SCALING)),
        (VPP_OUT, Variant::U32(color_format::RGB4)),
    ]);
    assert!(accepts(&desc, &[avc, encode, scale]));
}

#[test]
fn test_api_version_gate() {
    let desc = gpu_description();

    let older = config(&[(API_VERSION, Variant::U32(ApiVersion::new(2, 5).packed()))]);
    let special = validate(&desc, None, &[older], LibraryKind::Vpl).unwrap();
    assert_eq!(special.api_version, Some(ApiVersion::new(2, 5)));

    let newer = config(&[(API_VERSION, Variant::U32(ApiVersion::new(2, 7).packed()))]);
    assert!(matches!(
        validate(&desc, None, &[newer], LibraryKind::Vpl),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_api_version_from_split_fields() {
    let desc = gpu_description();
    let major = config(&[("mfxImplDescription.ApiVersion.Major", Variant::U16(2))]);
    let minor = config(&[("mfxImplDescription.ApiVersion.Minor", Variant::U16(7))]);

    assert!(accepts(&desc, std::slice::from_ref(&major)));
    assert!(!accepts(&desc, &[major, minor]));
}

#[test]
fn test_required_function() {
    let desc = gpu_description();
    let ctx = config(&[(FUNCTION, Variant::text("MFXVideoDECODE_DecodeFrameAsync"))]);
    let contexts = [ctx];

    let missing = ImplementedFunctions::new(["MFXInit", "MFXVideoENCODE_Init"]);
    assert!(matches!(
        validate(&desc, Some(&missing), &contexts, LibraryKind::Vpl),
        Err(Error::Unsupported(_))
    ));

    let present = ImplementedFunctions::new(["MFXInit", "MFXVideoDECODE_DecodeFrameAsync"]);
    validate(&desc, Some(&present), &contexts, LibraryKind::Vpl).unwrap();
}

#[test]
fn test_legacy_candidate_bypasses_category_checks() {
    let desc = gpu_description();
    let ctx = config(&[
        ("mfxImplDescription.Impl", Variant::U32(impl_type::HARDWARE)),
        (DEC_CODEC, Variant::U32(codec::VP9)),
    ]);
    let contexts = [ctx];

    assert!(validate(&desc, None, &contexts, LibraryKind::Vpl).is_err());
    validate(&desc, None, &contexts, LibraryKind::LegacyMsdk).unwrap();
}

#[test]
fn test_device_id_numeric_and_string_forms() {
    let desc = gpu_description();

    let numeric = config(&[(
        "mfxImplDescription.mfxDeviceDescription.DeviceID",
        Variant::U16(0x46a6),
    )]);
    assert!(accepts(&desc, &[numeric]));

    let legacy_path = config(&[(
        "mfxImplDescription.mfxDeviceDescription.device.DeviceID",
        Variant::U16(0x46a6),
    )]);
    assert!(accepts(&desc, &[legacy_path]));

    let text = config(&[(
        "mfxImplDescription.mfxDeviceDescription.DeviceID",
        Variant::text("46a6/0"),
    )]);
    assert!(accepts(&desc, &[text]));

    let other = config(&[(
        "mfxImplDescription.mfxDeviceDescription.DeviceID",
        Variant::U16(0x56a0),
    )]);
    assert!(!accepts(&desc, &[other]));
}

#[test]
fn test_special_values_reach_the_caller() {
    let desc = gpu_description();
    let first = config(&[
        ("mfxHandleType", Variant::U32(handle_type::VA_DISPLAY)),
        ("mfxHDL", Variant::handle(DeviceHandle(0xdead))),
    ]);
    let second = config(&[
        ("mfxHDL", Variant::handle(DeviceHandle(0xbeef))),
        (
            "mfxImplDescription.AccelerationMode",
            Variant::U32(accel_mode::VIA_VAAPI_DRM_RENDER_NODE),
        ),
    ]);

    let special = validate(&desc, None, &[first, second], LibraryKind::Vpl).unwrap();
    assert_eq!(special.device_handle_type, Some(handle_type::VA_DISPLAY));
    assert_eq!(special.device_handle, Some(DeviceHandle(0xbeef)));
    assert_eq!(
        special.acceleration_mode,
        Some(accel_mode::VIA_VAAPI_DRM_RENDER_NODE)
    );
}

#[test]
fn test_rejected_setter_leaves_context_usable() {
    let mut ctx = ConfigContext::new();
    assert!(matches!(
        ctx.set_filter_property("mfxImplDescription.Impl", Variant::U16(2)),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        ctx.set_filter_property("mfxImplDescription.ImplName", Variant::null()),
        Err(Error::NullPointer(_))
    ));
    assert!(matches!(
        ctx.set_filter_property("mfxImplDescription.Unknown", Variant::U32(1)),
        Err(Error::NotFound(_))
    ));

    assert!(ctx.is_empty());
    assert!(accepts(&gpu_description(), &[ctx]));
}
