//! Manifest loading and candidate filtering

use std::io::Write;
use std::path::PathBuf;

use mediadispatch_core::capabilities::constants::{codec, handle_type};
use mediadispatch_core::capabilities::{ApiVersion, DeviceHandle, LibraryKind, PropertyId};
use mediadispatch_core::manifest::NegotiationManifest;
use mediadispatch_core::Error;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_yaml_fixture_selects_hardware_hevc_decoder() {
    let manifest = NegotiationManifest::from_path(fixture("hevc_decode_session.yaml")).unwrap();
    assert_eq!(manifest.configs.len(), 2);
    assert_eq!(manifest.candidates.len(), 3);
    assert_eq!(manifest.candidates[2].kind, LibraryKind::LegacyMsdk);

    let loader = manifest.build_loader().unwrap();
    assert_eq!(
        loader.configs()[0].u32(PropertyId::DecCodecId),
        Some(codec::HEVC)
    );

    // software fails Impl, legacy fails the 2.5 version gate
    let accepted = loader.filter(&manifest.candidates);
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].index, 1);
    assert_eq!(accepted[0].name, "libmfx-gen");

    let special = accepted[0].special;
    assert_eq!(special.device_handle_type, Some(handle_type::VA_DISPLAY));
    assert_eq!(special.device_handle, Some(DeviceHandle(4096)));
    assert_eq!(special.api_version, Some(ApiVersion::new(2, 5)));
}

#[test]
fn test_json_manifest_from_tempfile() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "configs": [[{{"path": "mfxImplDescription.ImplName", "text": "mfx-sw"}}]],
            "candidates": [
                {{"name": "gpu", "description": {{"impl": 2, "impl_name": "mfx-gen"}}}},
                {{"name": "cpu", "description": {{"impl": 1, "impl_name": "mfx-sw"}}}}
            ]
        }}"#
    )
    .unwrap();

    let manifest = NegotiationManifest::from_path(file.path()).unwrap();
    let accepted = manifest.negotiate().unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].name, "cpu");
}

#[test]
fn test_yml_extension_is_read_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.yml");
    std::fs::write(
        &path,
        "configs:\n  - - path: mfxImplDescription.Impl\n      u32: 1\ncandidates: []\n",
    )
    .unwrap();

    let manifest = NegotiationManifest::from_path(&path).unwrap();
    assert_eq!(manifest.configs[0].len(), 1);
    assert!(manifest.negotiate().unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = NegotiationManifest::from_path(dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_manifest_is_parse_error() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{{\"configs\": 5}}").unwrap();
    assert!(matches!(
        NegotiationManifest::from_path(file.path()),
        Err(Error::Json(_))
    ));
}

#[test]
fn test_bad_setting_stops_negotiation() {
    let manifest = NegotiationManifest::from_yaml(
        r#"
configs:
  - - path: mfxImplDescription.mfxDecoderDescription.decoder.CodecID
      fourcc: HEVC1
candidates:
  - name: gpu
"#,
    )
    .unwrap();

    assert!(matches!(
        manifest.negotiate(),
        Err(Error::InvalidManifest(_))
    ));
}
