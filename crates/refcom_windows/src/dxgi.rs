//! DXGI handles.

use windows::Win32::Graphics::Dxgi::*;

use crate::com::{ComHandle, ComHandleExt};
use crate::d3d11;
use crate::error::Result;

pub type Factory = ComHandle<IDXGIFactory1>;
pub type Factory2 = ComHandle<IDXGIFactory2>;
pub type Adapter = ComHandle<IDXGIAdapter>;
pub type Adapter1 = ComHandle<IDXGIAdapter1>;
pub type Device = ComHandle<IDXGIDevice>;
pub type Output = ComHandle<IDXGIOutput>;
pub type Output1 = ComHandle<IDXGIOutput1>;
pub type OutputDuplication = ComHandle<IDXGIOutputDuplication>;
pub type Surface = ComHandle<IDXGISurface>;
pub type Resource = ComHandle<IDXGIResource>;
pub type SwapChain = ComHandle<IDXGISwapChain>;
pub type SwapChain1 = ComHandle<IDXGISwapChain1>;

pub fn create_factory() -> Result<Factory> {
    // SAFETY: no arguments; the factory is returned owned.
    let factory: IDXGIFactory1 = unsafe { CreateDXGIFactory1()? };
    tracing::debug!("created DXGI factory");
    Ok(Factory::from_interface(factory))
}

/// The DXGI view of a Direct3D 11 device.
pub fn device_of(device: &d3d11::Device) -> Result<Device> {
    device.cast::<IDXGIDevice>()
}

/// The adapter a DXGI device runs on.
pub fn adapter_of(device: &Device) -> Result<Adapter> {
    let device = device.require()?;
    // SAFETY: plain COM call on a live interface.
    let adapter = unsafe { device.GetAdapter()? };
    Ok(Adapter::from_interface(adapter))
}
