//! DirectWrite handles.

use refcom_settings::ComSettings;
use windows::Win32::Graphics::DirectWrite::*;
use windows::core::{HSTRING, w};

use crate::com::{ComHandle, ComHandleExt};
use crate::error::Result;

pub type Factory = ComHandle<IDWriteFactory>;
pub type TextFormat = ComHandle<IDWriteTextFormat>;
pub type TextLayout = ComHandle<IDWriteTextLayout>;
pub type FontCollection = ComHandle<IDWriteFontCollection>;
pub type FontFamily = ComHandle<IDWriteFontFamily>;
pub type Font = ComHandle<IDWriteFont>;
pub type FontFace = ComHandle<IDWriteFontFace>;
pub type FontFile = ComHandle<IDWriteFontFile>;
pub type RenderingParams = ComHandle<IDWriteRenderingParams>;
pub type InlineObject = ComHandle<IDWriteInlineObject>;
pub type Typography = ComHandle<IDWriteTypography>;

pub fn create_factory(settings: &ComSettings) -> Result<Factory> {
    let factory_type = if settings.dwrite_isolated {
        DWRITE_FACTORY_TYPE_ISOLATED
    } else {
        DWRITE_FACTORY_TYPE_SHARED
    };
    // SAFETY: the factory is returned owned.
    let factory: IDWriteFactory = unsafe { DWriteCreateFactory(factory_type)? };
    tracing::debug!(isolated = settings.dwrite_isolated, "created DirectWrite factory");
    Ok(Factory::from_interface(factory))
}

/// A regular-weight, upright text format in the user's locale.
pub fn create_text_format(factory: &Factory, family: &str, size: f32) -> Result<TextFormat> {
    let factory = factory.require()?;
    // SAFETY: the strings outlive the call.
    let format = unsafe {
        factory.CreateTextFormat(
            &HSTRING::from(family),
            None,
            DWRITE_FONT_WEIGHT_NORMAL,
            DWRITE_FONT_STYLE_NORMAL,
            DWRITE_FONT_STRETCH_NORMAL,
            size,
            w!(""),
        )?
    };
    Ok(TextFormat::from_interface(format))
}

pub fn create_text_layout(
    factory: &Factory,
    text: &str,
    format: &TextFormat,
    max_width: f32,
    max_height: f32,
) -> Result<TextLayout> {
    let factory = factory.require()?;
    let format = format.require()?;
    let wide: Vec<u16> = text.encode_utf16().collect();
    // SAFETY: `wide` outlives the call.
    let layout = unsafe { factory.CreateTextLayout(&wide, format, max_width, max_height)? };
    Ok(TextLayout::from_interface(layout))
}
