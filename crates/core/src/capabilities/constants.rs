//! Well-known values used in capability descriptors and config contexts
//!
//! Descriptors and contexts carry raw `u32`/`u16` codes so unknown values from
//! newer implementations pass through untouched. These constants name the
//! common ones.

/// Pack four ASCII bytes into a little-endian FourCC code.
///
/// ```rust
/// use mediadispatch_core::capabilities::constants::{codec, fourcc};
///
/// assert_eq!(fourcc(b"AVC "), codec::AVC);
/// assert_eq!(fourcc(b"NV12"), 0x3231_564E);
/// ```
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    (code[0] as u32) | ((code[1] as u32) << 8) | ((code[2] as u32) << 16) | ((code[3] as u32) << 24)
}

/// Codec identifiers.
pub mod codec {
    use super::fourcc;

    pub const AVC: u32 = fourcc(b"AVC ");
    pub const HEVC: u32 = fourcc(b"HEVC");
    pub const MPEG2: u32 = fourcc(b"MPG2");
    pub const VC1: u32 = fourcc(b"VC1 ");
    pub const VP8: u32 = fourcc(b"VP8 ");
    pub const VP9: u32 = fourcc(b"VP9 ");
    pub const AV1: u32 = fourcc(b"AV1 ");
    pub const JPEG: u32 = fourcc(b"JPEG");
    pub const VVC: u32 = fourcc(b"VVC ");
}

/// Surface color formats.
pub mod color_format {
    use super::fourcc;

    pub const NV12: u32 = fourcc(b"NV12");
    pub const YV12: u32 = fourcc(b"YV12");
    pub const I420: u32 = fourcc(b"I420");
    pub const P010: u32 = fourcc(b"P010");
    pub const YUY2: u32 = fourcc(b"YUY2");
    pub const RGB4: u32 = fourcc(b"RGB4");
    pub const BGR4: u32 = fourcc(b"BGR4");
    pub const AYUV: u32 = fourcc(b"AYUV");
    pub const Y410: u32 = fourcc(b"Y410");
}

/// Video processing filter identifiers.
pub mod filter {
    use super::fourcc;

    pub const DENOISE: u32 = fourcc(b"DNIS");
    pub const SCALING: u32 = fourcc(b"SCLF");
    pub const COMPOSITE: u32 = fourcc(b"VCMP");
    pub const DEINTERLACING: u32 = fourcc(b"VPDI");
    pub const PROCAMP: u32 = fourcc(b"PAMP");
}

/// Implementation types (`Impl` property).
pub mod impl_type {
    pub const SOFTWARE: u32 = 0x0001;
    pub const HARDWARE: u32 = 0x0002;
}

/// Acceleration modes.
pub mod accel_mode {
    pub const NA: u32 = 0;
    pub const VIA_D3D9: u32 = 0x0200;
    pub const VIA_D3D11: u32 = 0x0300;
    pub const VIA_VAAPI: u32 = 0x0400;
    pub const VIA_VAAPI_DRM_RENDER_NODE: u32 = 0x0401;
    pub const VIA_VAAPI_DRM_MODESET: u32 = 0x0402;
    pub const VIA_VAAPI_GLX: u32 = 0x0403;
    pub const VIA_VAAPI_X11: u32 = 0x0404;
    pub const VIA_VAAPI_WAYLAND: u32 = 0x0405;
    pub const VIA_HDDLUNITE: u32 = 0x0500;
}

/// Memory resource types (`MemHandleType` properties).
pub mod mem_type {
    pub const SYSTEM_SURFACE: u32 = 1;
    pub const VA_SURFACE: u32 = 2;
    pub const VA_BUFFER: u32 = 3;
    pub const DX9_SURFACE: u32 = 4;
    pub const DX11_TEXTURE: u32 = 5;
    pub const DX12_RESOURCE: u32 = 6;
    pub const DMA_RESOURCE: u32 = 7;
}

/// Device handle types (`mfxHandleType` property).
pub mod handle_type {
    pub const D3D9_DEVICE_MANAGER: u32 = 1;
    pub const D3D11_DEVICE: u32 = 3;
    pub const VA_DISPLAY: u32 = 4;
    pub const VA_CONFIG_ID: u32 = 6;
    pub const VA_CONTEXT_ID: u32 = 7;
}

/// Vendor identifiers.
pub mod vendor {
    pub const INTEL: u32 = 0x8086;
}
