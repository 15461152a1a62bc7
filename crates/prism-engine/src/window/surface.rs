use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::device::SurfaceErrorAction;

use super::RuntimeConfig;

/// The window plus the GPU-presentable surface bound to it.
///
/// The surface borrows the window and the wgpu instance, so all three live in
/// one self-referencing struct. The surface starts unconfigured; a device
/// configures it on first attach.
#[self_referencing]
pub struct HostSurface {
    instance: wgpu::Instance,
    window: Window,

    /// Last configuration applied to the surface.
    config: Option<wgpu::SurfaceConfiguration>,

    #[borrows(instance, window)]
    #[covariant]
    surface: wgpu::Surface<'this>,
}

impl HostSurface {
    /// Creates the window described by `config` and a surface for it.
    pub fn create(event_loop: &ActiveEventLoop, config: &RuntimeConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.inner_size)
            .with_position(config.position)
            .with_resizable(config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let host = HostSurfaceTryBuilder {
            instance,
            window,
            config: None,
            surface_builder: |instance, window| instance.create_surface(window),
        }
        .try_build()
        .context("failed to create wgpu surface")?;

        log::info!(
            "window `{}` created ({}x{} physical)",
            config.title,
            host.inner_size().width,
            host.inner_size().height
        );

        Ok(host)
    }

    pub fn window_id(&self) -> WindowId {
        self.borrow_window().id()
    }

    /// Current content-area size in physical pixels.
    pub fn inner_size(&self) -> PhysicalSize<u32> {
        self.borrow_window().inner_size()
    }

    pub fn instance(&self) -> &wgpu::Instance {
        self.borrow_instance()
    }

    pub fn surface(&self) -> &wgpu::Surface<'_> {
        self.borrow_surface()
    }

    /// Size the surface was last configured with, if any.
    pub fn configured_size(&self) -> Option<PhysicalSize<u32>> {
        self.borrow_config()
            .as_ref()
            .map(|c| PhysicalSize::new(c.width, c.height))
    }

    /// Applies `config` to the surface and remembers it.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; such
    /// requests are ignored.
    pub fn configure(&mut self, device: &wgpu::Device, config: wgpu::SurfaceConfiguration) {
        if config.width == 0 || config.height == 0 {
            return;
        }

        self.with_mut(|fields| {
            fields.surface.configure(device, &config);
            *fields.config = Some(config);
        });
    }

    pub fn current_texture(&self) -> std::result::Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.borrow_surface().get_current_texture()
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when it was lost or went stale.
    pub fn handle_surface_error(
        &mut self,
        device: &wgpu::Device,
        err: &wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        let action = crate::device::surface_error_action(err);

        if action == SurfaceErrorAction::Reconfigured {
            self.with_mut(|fields| {
                if let Some(config) = fields.config.as_ref() {
                    fields.surface.configure(device, config);
                }
            });
        }

        action
    }

    pub fn request_redraw(&self) {
        self.borrow_window().request_redraw();
    }

    pub fn pre_present_notify(&self) {
        self.borrow_window().pre_present_notify();
    }
}
