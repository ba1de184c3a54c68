use std::marker::PhantomData;

use refcom_settings::ApartmentModel;
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::System::Com::{
    COINIT, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE, COINIT_MULTITHREADED,
    CoInitializeEx, CoUninitialize,
};

use crate::error::{ComError, Result};

/// Keeps the current thread inside a COM apartment.
///
/// Dropping the guard balances the `CoInitializeEx` it made. A thread that
/// already lives in an apartment of the other model is accepted as is and
/// left alone on drop. Handles created inside the apartment must be dropped
/// before the guard.
#[derive(Debug)]
pub struct Apartment {
    model: ApartmentModel,
    balanced: bool,
    // Apartments belong to a thread.
    _not_send: PhantomData<*const ()>,
}

impl Apartment {
    pub fn enter(model: ApartmentModel) -> Result<Self> {
        let threading = match model {
            ApartmentModel::SingleThreaded => COINIT_APARTMENTTHREADED,
            ApartmentModel::MultiThreaded => COINIT_MULTITHREADED,
        };
        let flags = COINIT(threading.0 | COINIT_DISABLE_OLE1DDE.0);

        // SAFETY: paired with CoUninitialize in Drop when it succeeds.
        let hr = unsafe { CoInitializeEx(None, flags) };
        if hr == RPC_E_CHANGED_MODE {
            tracing::debug!(?model, "thread already in a different COM apartment");
            return Ok(Self {
                model,
                balanced: false,
                _not_send: PhantomData,
            });
        }
        hr.ok().map_err(ComError::Apartment)?;

        tracing::debug!(?model, "entered COM apartment");
        Ok(Self {
            model,
            balanced: true,
            _not_send: PhantomData,
        })
    }

    pub fn model(&self) -> ApartmentModel {
        self.model
    }

    /// Whether this guard will call `CoUninitialize`.
    pub fn is_balanced(&self) -> bool {
        self.balanced
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        if self.balanced {
            // SAFETY: balances the successful CoInitializeEx in `enter`.
            unsafe { CoUninitialize() };
        }
    }
}
