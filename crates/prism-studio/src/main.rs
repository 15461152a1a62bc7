use anyhow::{Context, Result};

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::{GpuInit, WgpuDevice};
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{FrameOutcome, FrameRenderer, RendererConfig};
use prism_engine::window::{Runtime, RuntimeConfig};

/// Draws the triangle on every tick.
struct TriangleView {
    renderer: FrameRenderer<WgpuDevice>,
}

impl App for TriangleView {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        // A renderer without a device stays idle; the window remains open.
        if !self.renderer.is_ready() {
            return AppControl::Continue;
        }

        match self.renderer.draw(ctx.surface) {
            Ok(FrameOutcome::Submitted) | Ok(FrameOutcome::Skipped) => AppControl::Continue,
            Err(e) => {
                log::error!("frame {} failed: {e:#}", ctx.time.frame_index);
                AppControl::Exit
            }
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig {
        title: "Prism Studio".to_string(),
        ..Default::default()
    };
    let gpu_init = GpuInit::default();
    let renderer_config = RendererConfig::default();

    log::info!(
        "starting {} at {} fps (shaders from {})",
        runtime.title,
        runtime.target_fps,
        renderer_config.shader_path.display()
    );

    Runtime::run(runtime, move |host| {
        let device = WgpuDevice::acquire(host, gpu_init);
        let renderer = FrameRenderer::initialize(device, &renderer_config)
            .context("failed to set up the triangle renderer")?;
        Ok(TriangleView { renderer })
    })
}
