//! The resource workload the probe runs.
//!
//! Every handle is created and dropped inside `run`, so with tracking on the
//! final report should show no live references.

use refcom_settings::Settings;

/// Runs the workload and returns how many resources it created.
#[cfg(windows)]
pub fn run(settings: &Settings) -> anyhow::Result<usize> {
    use refcom_windows::{Apartment, ComHandleExt, animation, d2d, d3d11, dwrite, dxgi, wic};
    use windows::Win32::Graphics::Direct2D::Common::{D2D_RECT_F, D2D1_COLOR_F};

    let com = &settings.com;
    let _apartment = Apartment::enter(com.apartment)?;
    let mut created = 0;

    let wic_factory = wic::create_factory()?;
    let bitmap = wic::create_bitmap(&wic_factory, 64, 64)?;
    let d2d_factory = d2d::create_factory(com)?;
    let target = d2d::create_wic_bitmap_render_target(&d2d_factory, &bitmap)?;
    let brush = d2d::create_solid_color_brush(
        &target,
        D2D1_COLOR_F {
            r: 0.2,
            g: 0.4,
            b: 0.8,
            a: 1.0,
        },
    )?;
    created += 5;

    // The brush is shared the way a renderer's cache would share it.
    let cached = brush.clone();
    let target_ref = target.require()?;
    let rect = D2D_RECT_F {
        left: 8.0,
        top: 8.0,
        right: 56.0,
        bottom: 56.0,
    };
    // SAFETY: every interface used is kept alive by its handle.
    unsafe {
        target_ref.BeginDraw();
        target_ref.Clear(None);
        target_ref.FillRectangle(&rect, cached.require()?);
        target_ref.EndDraw(None, None)?;
    }
    tracing::info!(refs = ?brush.ref_count_hint(), "drew into WIC bitmap");
    drop(cached);

    let dwrite_factory = dwrite::create_factory(com)?;
    let format = dwrite::create_text_format(&dwrite_factory, "Segoe UI", 12.0)?;
    let layout = dwrite::create_text_layout(&dwrite_factory, "refcom", &format, 256.0, 32.0)?;
    created += 3;
    tracing::debug!(bound = layout.is_bound(), "text layout ready");

    // Machines without a hardware adapter (CI, RDP) can't create a device.
    match d3d11::create_device(com) {
        Ok(d3d) => {
            let dxgi_device = dxgi::device_of(&d3d.device)?;
            let d2d_device = d2d::create_device(&d2d_factory, &dxgi_device)?;
            let context = d2d::create_device_context(&d2d_device)?;
            created += 5;
            tracing::info!(
                feature_level = d3d.feature_level.0,
                context_bound = context.is_bound(),
                "Direct3D 11 interop ready"
            );
        }
        Err(e) => tracing::warn!(error = %e, "skipping Direct3D 11 interop"),
    }

    let manager = animation::create_manager()?;
    let library = animation::create_transition_library()?;
    let variable = animation::create_variable(&manager, 0.0)?;
    let storyboard = animation::create_storyboard(&manager)?;
    let transition = animation::create_linear_transition(&library, 0.5, 1.0)?;
    created += 5;
    tracing::debug!(
        variable = ?variable,
        storyboard = ?storyboard,
        transition = ?transition,
        "animation objects ready"
    );

    Ok(created)
}

/// Without COM, the workload shares counted boxes instead.
#[cfg(not(windows))]
pub fn run(_settings: &Settings) -> anyhow::Result<usize> {
    use refcom::{Counted, Handle};

    struct Texture {
        width: u32,
        height: u32,
    }

    let atlas = Counted::new(Texture {
        width: 1024,
        height: 1024,
    });
    let mut sprites: Vec<Handle<Counted<Texture>>> = (0..16).map(|_| atlas.clone()).collect();
    let refs = atlas.resource().map_or(0, Counted::ref_count);
    tracing::info!(refs, "atlas shared by sprites");

    let mut replacement = Handle::empty();
    replacement.clone_from(&atlas);
    sprites.truncate(4);
    let moved = sprites.pop().unwrap_or_default();
    if let Some(texture) = moved.resource().map(Counted::get) {
        tracing::debug!(
            width = texture.width,
            height = texture.height,
            "moved sprite still bound"
        );
    }

    let refs = atlas.resource().map_or(0, Counted::ref_count);
    tracing::info!(refs, "after trimming sprites");
    Ok(1)
}
