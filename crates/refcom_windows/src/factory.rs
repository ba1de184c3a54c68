use std::sync::OnceLock;

use refcom_settings::ComSettings;

use crate::error::Result;
use crate::{d2d, dwrite, wic};

/// Process-wide factories.
static SHARED_FACTORIES: OnceLock<SharedFactories> = OnceLock::new();

/// Direct2D, DirectWrite and WIC factories shared for the process lifetime.
///
/// They are heavyweight and stateless from the caller's side, so one of each
/// is created on first use and handed out by cloning the handle.
pub struct SharedFactories {
    d2d: d2d::Factory,
    dwrite: dwrite::Factory,
    wic: wic::Factory,
}

// SAFETY: the factories are never mutated through this container. Direct2D is
// created multi-threaded here, DirectWrite shared factories are free-threaded
// and the WIC factory is free-threaded marshaled.
unsafe impl Send for SharedFactories {}
unsafe impl Sync for SharedFactories {}

impl SharedFactories {
    /// The shared instance, created on the first successful call.
    ///
    /// The calling thread needs a COM apartment for the WIC factory. Only the
    /// first caller's `settings` are used.
    pub fn get(settings: &ComSettings) -> Result<&'static SharedFactories> {
        if let Some(factories) = SHARED_FACTORIES.get() {
            return Ok(factories);
        }

        let factories = Self::create(settings)?;
        // A concurrent caller may have won the race; its instance is kept.
        Ok(SHARED_FACTORIES.get_or_init(|| factories))
    }

    fn create(settings: &ComSettings) -> Result<Self> {
        let settings = ComSettings {
            d2d_multithreaded: true,
            ..settings.clone()
        };
        Ok(Self {
            d2d: d2d::create_factory(&settings)?,
            dwrite: dwrite::create_factory(&settings)?,
            wic: wic::create_factory()?,
        })
    }

    #[inline]
    pub fn d2d(&self) -> &d2d::Factory {
        &self.d2d
    }

    #[inline]
    pub fn dwrite(&self) -> &dwrite::Factory {
        &self.dwrite
    }

    #[inline]
    pub fn wic(&self) -> &wic::Factory {
        &self.wic
    }
}
