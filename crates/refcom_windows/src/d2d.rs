//! Direct2D handles.

use refcom_settings::{ComSettings, D2dDebugLevel};
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT,
};
use windows::Win32::Graphics::Direct2D::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;

use crate::com::{ComHandle, ComHandleExt};
use crate::error::Result;
use crate::{dxgi, wic};

pub type Factory = ComHandle<ID2D1Factory1>;
pub type Device = ComHandle<ID2D1Device>;
pub type DeviceContext = ComHandle<ID2D1DeviceContext>;
pub type RenderTarget = ComHandle<ID2D1RenderTarget>;
pub type HwndRenderTarget = ComHandle<ID2D1HwndRenderTarget>;
pub type BitmapRenderTarget = ComHandle<ID2D1BitmapRenderTarget>;
pub type Bitmap = ComHandle<ID2D1Bitmap>;
pub type Bitmap1 = ComHandle<ID2D1Bitmap1>;
pub type Brush = ComHandle<ID2D1Brush>;
pub type SolidColorBrush = ComHandle<ID2D1SolidColorBrush>;
pub type LinearGradientBrush = ComHandle<ID2D1LinearGradientBrush>;
pub type RadialGradientBrush = ComHandle<ID2D1RadialGradientBrush>;
pub type BitmapBrush = ComHandle<ID2D1BitmapBrush>;
pub type GradientStopCollection = ComHandle<ID2D1GradientStopCollection>;
pub type StrokeStyle = ComHandle<ID2D1StrokeStyle>;
pub type Geometry = ComHandle<ID2D1Geometry>;
pub type RectangleGeometry = ComHandle<ID2D1RectangleGeometry>;
pub type RoundedRectangleGeometry = ComHandle<ID2D1RoundedRectangleGeometry>;
pub type EllipseGeometry = ComHandle<ID2D1EllipseGeometry>;
pub type PathGeometry = ComHandle<ID2D1PathGeometry>;
pub type GeometrySink = ComHandle<ID2D1GeometrySink>;
pub type GeometryGroup = ComHandle<ID2D1GeometryGroup>;
pub type Layer = ComHandle<ID2D1Layer>;
pub type Mesh = ComHandle<ID2D1Mesh>;
pub type DrawingStateBlock = ComHandle<ID2D1DrawingStateBlock>;
pub type Effect = ComHandle<ID2D1Effect>;
pub type Image = ComHandle<ID2D1Image>;
pub type CommandList = ComHandle<ID2D1CommandList>;

fn debug_level(level: D2dDebugLevel) -> D2D1_DEBUG_LEVEL {
    match level {
        D2dDebugLevel::None => D2D1_DEBUG_LEVEL_NONE,
        D2dDebugLevel::Error => D2D1_DEBUG_LEVEL_ERROR,
        D2dDebugLevel::Warning => D2D1_DEBUG_LEVEL_WARNING,
        D2dDebugLevel::Information => D2D1_DEBUG_LEVEL_INFORMATION,
    }
}

pub fn create_factory(settings: &ComSettings) -> Result<Factory> {
    let factory_type = if settings.d2d_multithreaded {
        D2D1_FACTORY_TYPE_MULTI_THREADED
    } else {
        D2D1_FACTORY_TYPE_SINGLE_THREADED
    };
    let options = D2D1_FACTORY_OPTIONS {
        debugLevel: debug_level(settings.d2d_debug_level),
    };

    // SAFETY: `options` outlives the call.
    let factory: ID2D1Factory1 = unsafe {
        D2D1CreateFactory(factory_type, Some(&options as *const D2D1_FACTORY_OPTIONS))?
    };
    tracing::debug!(
        multithreaded = settings.d2d_multithreaded,
        debug_level = ?settings.d2d_debug_level,
        "created Direct2D factory"
    );
    Ok(Factory::from_interface(factory))
}

/// A Direct2D device on top of a DXGI device.
pub fn create_device(factory: &Factory, dxgi_device: &dxgi::Device) -> Result<Device> {
    let factory = factory.require()?;
    let dxgi_device = dxgi_device.require()?;
    // SAFETY: both interfaces are kept alive by their handles.
    let device = unsafe { factory.CreateDevice(dxgi_device)? };
    Ok(Device::from_interface(device))
}

pub fn create_device_context(device: &Device) -> Result<DeviceContext> {
    let device = device.require()?;
    // SAFETY: plain COM call on a live interface.
    let context = unsafe { device.CreateDeviceContext(D2D1_DEVICE_CONTEXT_OPTIONS_NONE)? };
    Ok(DeviceContext::from_interface(context))
}

/// A render target drawing into a WIC bitmap (premultiplied BGRA).
pub fn create_wic_bitmap_render_target(
    factory: &Factory,
    bitmap: &wic::Bitmap,
) -> Result<RenderTarget> {
    let factory = factory.require()?;
    let bitmap = bitmap.require()?;
    let properties = D2D1_RENDER_TARGET_PROPERTIES {
        pixelFormat: D2D1_PIXEL_FORMAT {
            format: DXGI_FORMAT_B8G8R8A8_UNORM,
            alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
        },
        ..Default::default()
    };
    // SAFETY: `properties` outlives the call.
    let target = unsafe { factory.CreateWicBitmapRenderTarget(bitmap, &properties)? };
    Ok(RenderTarget::from_interface(target))
}

pub fn create_solid_color_brush(
    target: &RenderTarget,
    color: D2D1_COLOR_F,
) -> Result<SolidColorBrush> {
    let target = target.require()?;
    // SAFETY: `color` outlives the call.
    let brush = unsafe { target.CreateSolidColorBrush(&color, None)? };
    Ok(SolidColorBrush::from_interface(brush))
}

pub fn create_path_geometry(factory: &Factory) -> Result<PathGeometry> {
    // ID2D1Factory1 shadows this with a variant returning ID2D1PathGeometry1.
    let factory: &ID2D1Factory = factory.require()?;
    // SAFETY: plain COM call on a live interface.
    let geometry = unsafe { factory.CreatePathGeometry()? };
    Ok(PathGeometry::from_interface(geometry))
}
