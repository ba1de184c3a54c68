#![cfg(windows)]

use refcom_settings::{ApartmentModel, ComSettings};
use refcom_windows::{
    Apartment, ComError, ComHandleExt, animation, d2d, d3d11, dwrite, dxgi, wic,
};
use windows::Win32::Graphics::Direct2D::Common::D2D1_COLOR_F;
use windows::Win32::Graphics::Direct2D::{ID2D1Factory, ID2D1Factory1};
use windows::Win32::Graphics::Direct3D11::{
    D3D11_BIND_SHADER_RESOURCE, D3D11_TEXTURE2D_DESC, D3D11_USAGE_DEFAULT,
};
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_SAMPLE_DESC};

/// A hardware device, or `None` on machines without an adapter (CI, RDP).
fn hardware_device() -> Option<d3d11::CreatedDevice> {
    match d3d11::create_device(&ComSettings::default()) {
        Ok(created) => Some(created),
        Err(ComError::Com(e)) => {
            eprintln!("no Direct3D 11 hardware device: {e}");
            None
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn clones_share_one_factory() {
    let factory = d2d::create_factory(&ComSettings::default()).unwrap();
    let base = factory.ref_count_hint().unwrap();

    let copy = factory.clone();
    assert_eq!(factory.ref_count_hint(), Some(base + 1));
    assert!(refcom::Handle::ptr_eq(&factory, &copy));

    drop(copy);
    assert_eq!(factory.ref_count_hint(), Some(base));
}

#[test]
fn interface_round_trip_keeps_count() {
    let factory = d2d::create_factory(&ComSettings::default()).unwrap();
    let base = factory.ref_count_hint().unwrap();

    let interface: ID2D1Factory1 = factory.into_interface().unwrap();
    let factory = d2d::Factory::from_interface(interface);
    assert_eq!(factory.ref_count_hint(), Some(base));

    let borrowed = factory.to_interface().unwrap();
    assert_eq!(factory.ref_count_hint(), Some(base + 1));
    drop(borrowed);
}

#[test]
fn cast_queries_base_interface() {
    let factory = d2d::create_factory(&ComSettings::default()).unwrap();
    let base = factory.cast::<ID2D1Factory>().unwrap();
    assert!(base.is_bound());
    assert_eq!(base.as_raw().cast::<()>(), factory.as_raw().cast::<()>());
}

#[test]
fn empty_handle_is_rejected() {
    let empty = d2d::Factory::empty();
    assert!(matches!(
        d2d::create_path_geometry(&empty),
        Err(ComError::Empty { .. })
    ));
}

#[test]
fn draws_into_wic_bitmap() {
    let _apartment = Apartment::enter(ApartmentModel::MultiThreaded).unwrap();
    let settings = ComSettings::default();

    let wic_factory = wic::create_factory().unwrap();
    let bitmap = wic::create_bitmap(&wic_factory, 16, 16).unwrap();
    let factory = d2d::create_factory(&settings).unwrap();
    let target = d2d::create_wic_bitmap_render_target(&factory, &bitmap).unwrap();
    let brush = d2d::create_solid_color_brush(
        &target,
        D2D1_COLOR_F {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        },
    )
    .unwrap();

    let target_ref = target.require().unwrap();
    unsafe {
        target_ref.BeginDraw();
        target_ref.Clear(None);
        target_ref.EndDraw(None, None).unwrap();
    }
    assert!(brush.is_bound());
}

#[test]
fn text_layout_from_shared_dwrite_factory() {
    let factory = dwrite::create_factory(&ComSettings::default()).unwrap();
    let format = dwrite::create_text_format(&factory, "Segoe UI", 14.0).unwrap();
    let layout = dwrite::create_text_layout(&factory, "handle", &format, 200.0, 50.0).unwrap();
    assert!(layout.is_bound());
}

#[test]
fn animation_objects_are_handles() {
    let _apartment = Apartment::enter(ApartmentModel::SingleThreaded).unwrap();

    let manager = animation::create_manager().unwrap();
    let timer = animation::create_timer().unwrap();
    let library = animation::create_transition_library().unwrap();
    let variable = animation::create_variable(&manager, 0.0).unwrap();
    let storyboard = animation::create_storyboard(&manager).unwrap();
    let transition = animation::create_linear_transition(&library, 0.25, 1.0).unwrap();

    for bound in [
        timer.is_bound(),
        variable.is_bound(),
        storyboard.is_bound(),
        transition.is_bound(),
    ] {
        assert!(bound);
    }
}

#[test]
fn dxgi_factory_is_a_handle() {
    let factory = dxgi::create_factory().unwrap();
    assert!(factory.is_bound());
    assert!(factory.ref_count_hint().unwrap() >= 1);
}

#[test]
fn device_slots_adopt_created_objects() {
    let Some(created) = hardware_device() else {
        return;
    };
    assert!(created.device.is_bound());
    assert!(created.context.is_bound());

    let base = created.device.ref_count_hint().unwrap();
    let desc = D3D11_TEXTURE2D_DESC {
        Width: 16,
        Height: 16,
        MipLevels: 1,
        ArraySize: 1,
        Format: DXGI_FORMAT_B8G8R8A8_UNORM,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Usage: D3D11_USAGE_DEFAULT,
        BindFlags: D3D11_BIND_SHADER_RESOURCE.0 as u32,
        CPUAccessFlags: 0,
        MiscFlags: 0,
    };
    let texture = d3d11::create_texture_2d(&created.device, &desc).unwrap();
    assert!(texture.is_bound());

    drop(texture);
    assert_eq!(created.device.ref_count_hint(), Some(base));
}

#[test]
fn dxgi_views_of_a_device() {
    let Some(created) = hardware_device() else {
        return;
    };
    let dxgi_device = dxgi::device_of(&created.device).unwrap();
    assert!(dxgi_device.is_bound());

    let adapter = dxgi::adapter_of(&dxgi_device).unwrap();
    assert!(adapter.is_bound());

    let d2d_factory = d2d::create_factory(&ComSettings::default()).unwrap();
    let d2d_device = d2d::create_device(&d2d_factory, &dxgi_device).unwrap();
    let context = d2d::create_device_context(&d2d_device).unwrap();
    assert!(context.is_bound());
}
