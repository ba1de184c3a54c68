//! Windows Imaging Component handles.

use windows::Win32::Graphics::Imaging::*;
use windows::Win32::System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance};

use crate::com::{ComHandle, ComHandleExt};
use crate::error::Result;

pub type Factory = ComHandle<IWICImagingFactory2>;
pub type Bitmap = ComHandle<IWICBitmap>;
pub type BitmapSource = ComHandle<IWICBitmapSource>;
pub type BitmapLock = ComHandle<IWICBitmapLock>;
pub type BitmapDecoder = ComHandle<IWICBitmapDecoder>;
pub type BitmapEncoder = ComHandle<IWICBitmapEncoder>;
pub type BitmapFrameDecode = ComHandle<IWICBitmapFrameDecode>;
pub type BitmapFrameEncode = ComHandle<IWICBitmapFrameEncode>;
pub type FormatConverter = ComHandle<IWICFormatConverter>;
pub type BitmapScaler = ComHandle<IWICBitmapScaler>;
pub type Palette = ComHandle<IWICPalette>;
pub type Stream = ComHandle<IWICStream>;

/// Needs a COM apartment on the calling thread.
pub fn create_factory() -> Result<Factory> {
    // SAFETY: in-process class activation; the factory is returned owned.
    let factory: IWICImagingFactory2 =
        unsafe { CoCreateInstance(&CLSID_WICImagingFactory2, None, CLSCTX_INPROC_SERVER)? };
    tracing::debug!("created WIC imaging factory");
    Ok(Factory::from_interface(factory))
}

/// An uninitialized premultiplied BGRA bitmap owned by WIC.
pub fn create_bitmap(factory: &Factory, width: u32, height: u32) -> Result<Bitmap> {
    let factory = factory.require()?;
    // SAFETY: the pixel format GUID is a static.
    let bitmap = unsafe {
        factory.CreateBitmap(
            width,
            height,
            &GUID_WICPixelFormat32bppPBGRA,
            WICBitmapCacheOnLoad,
        )?
    };
    Ok(Bitmap::from_interface(bitmap))
}
