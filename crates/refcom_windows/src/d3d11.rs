//! Direct3D 11 handles.

use refcom_settings::ComSettings;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;

use crate::com::{ComHandle, ComHandleExt, ensure_bound};
use crate::error::Result;

pub type Device = ComHandle<ID3D11Device>;
pub type DeviceContext = ComHandle<ID3D11DeviceContext>;
pub type Buffer = ComHandle<ID3D11Buffer>;
pub type Texture2D = ComHandle<ID3D11Texture2D>;
pub type RenderTargetView = ComHandle<ID3D11RenderTargetView>;
pub type DepthStencilView = ComHandle<ID3D11DepthStencilView>;
pub type ShaderResourceView = ComHandle<ID3D11ShaderResourceView>;
pub type VertexShader = ComHandle<ID3D11VertexShader>;
pub type PixelShader = ComHandle<ID3D11PixelShader>;
pub type InputLayout = ComHandle<ID3D11InputLayout>;
pub type SamplerState = ComHandle<ID3D11SamplerState>;
pub type BlendState = ComHandle<ID3D11BlendState>;
pub type RasterizerState = ComHandle<ID3D11RasterizerState>;
pub type DepthStencilState = ComHandle<ID3D11DepthStencilState>;
pub type Query = ComHandle<ID3D11Query>;

const FEATURE_LEVELS: [D3D_FEATURE_LEVEL; 4] = [
    D3D_FEATURE_LEVEL_11_1,
    D3D_FEATURE_LEVEL_11_0,
    D3D_FEATURE_LEVEL_10_1,
    D3D_FEATURE_LEVEL_10_0,
];

/// A hardware device with BGRA support, as Direct2D interop needs.
#[derive(Debug)]
pub struct CreatedDevice {
    pub device: Device,
    pub context: DeviceContext,
    pub feature_level: D3D_FEATURE_LEVEL,
}

pub fn create_device(settings: &ComSettings) -> Result<CreatedDevice> {
    let mut flags = D3D11_CREATE_DEVICE_BGRA_SUPPORT;
    if settings.d3d_debug_layer {
        flags |= D3D11_CREATE_DEVICE_DEBUG;
    }

    let mut device = Device::empty();
    let mut context = DeviceContext::empty();
    let mut feature_level = D3D_FEATURE_LEVEL::default();

    // SAFETY: both slots are empty handles that adopt what the call writes.
    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE::default(),
            flags,
            Some(&FEATURE_LEVELS[..]),
            D3D11_SDK_VERSION,
            Some(device.slot().cast::<Option<ID3D11Device>>()),
            Some(&mut feature_level),
            Some(context.slot().cast::<Option<ID3D11DeviceContext>>()),
        )?;
    }

    tracing::debug!(
        feature_level = feature_level.0,
        debug_layer = settings.d3d_debug_layer,
        "created Direct3D 11 device"
    );
    Ok(CreatedDevice {
        device: ensure_bound(device)?,
        context: ensure_bound(context)?,
        feature_level,
    })
}

pub fn create_texture_2d(device: &Device, desc: &D3D11_TEXTURE2D_DESC) -> Result<Texture2D> {
    let device = device.require()?;
    let mut texture = Texture2D::empty();
    // SAFETY: `desc` outlives the call; the slot belongs to an empty handle.
    unsafe {
        device.CreateTexture2D(
            desc,
            None,
            Some(texture.slot().cast::<Option<ID3D11Texture2D>>()),
        )?;
    }
    ensure_bound(texture)
}
