use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// What attaching to a surface has to do before a frame can be acquired.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum AttachPlan {
    /// The current configuration still matches the window.
    Keep,
    Configure(PhysicalSize<u32>),
    /// 0x0 content area and no configuration yet. wgpu cannot configure a
    /// zero-sized surface, so no frame can be acquired until it grows.
    Unpresentable,
}

pub(crate) fn plan_attach(
    configured: Option<PhysicalSize<u32>>,
    size: PhysicalSize<u32>,
) -> AttachPlan {
    if configured == Some(size) {
        return AttachPlan::Keep;
    }

    if size.width == 0 || size.height == 0 {
        return match configured {
            Some(_) => AttachPlan::Keep,
            None => AttachPlan::Unpresentable,
        };
    }

    AttachPlan::Configure(size)
}

/// Picks `preferred` if the surface supports it, then its sRGB/linear twin,
/// then the first supported format.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    preferred: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }

    let candidates = [
        preferred,
        preferred.remove_srgb_suffix(),
        preferred.add_srgb_suffix(),
    ];
    for f in candidates {
        if formats.contains(&f) {
            return Some(f);
        }
    }

    Some(formats[0])
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// FIFO is the only mode every surface must support.
pub(crate) fn choose_present_mode(
    modes: &[wgpu::PresentMode],
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn first_attach_configures_window_size() {
        let size = PhysicalSize::new(918, 1118);
        assert_eq!(plan_attach(None, size), AttachPlan::Configure(size));
    }

    #[test]
    fn matching_configuration_is_kept() {
        let size = PhysicalSize::new(918, 1118);
        assert_eq!(plan_attach(Some(size), size), AttachPlan::Keep);
    }

    #[test]
    fn changed_size_reconfigures() {
        let old = PhysicalSize::new(918, 1118);
        let new = PhysicalSize::new(1836, 2236);
        assert_eq!(plan_attach(Some(old), new), AttachPlan::Configure(new));
    }

    #[test]
    fn zero_sized_unconfigured_surface_is_unpresentable() {
        assert_eq!(plan_attach(None, PhysicalSize::new(0, 0)), AttachPlan::Unpresentable);
        assert_eq!(plan_attach(None, PhysicalSize::new(918, 0)), AttachPlan::Unpresentable);
    }

    #[test]
    fn zero_size_keeps_previous_configuration() {
        let old = PhysicalSize::new(918, 1118);
        assert_eq!(plan_attach(Some(old), PhysicalSize::new(0, 0)), AttachPlan::Keep);
    }

    // ── negotiation ───────────────────────────────────────────────────────

    #[test]
    fn format_exact_match_wins() {
        let formats = [F::Bgra8UnormSrgb, F::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, F::Bgra8Unorm), Some(F::Bgra8Unorm));
    }

    #[test]
    fn format_falls_back_to_srgb_twin() {
        let formats = [F::Rgba16Float, F::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, F::Bgra8Unorm), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn format_falls_back_to_first() {
        let formats = [F::Rgba8Unorm, F::Rgba16Float];
        assert_eq!(choose_surface_format(&formats, F::Bgra8Unorm), Some(F::Rgba8Unorm));
    }

    #[test]
    fn format_none_when_unsupported() {
        assert_eq!(choose_surface_format(&[], F::Bgra8Unorm), None);
    }

    #[test]
    fn alpha_mode_requested_only_if_supported() {
        let modes = [wgpu::CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let modes = [wgpu::PresentMode::Fifo];
        assert_eq!(
            choose_present_mode(&modes, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Fifo
        );
    }

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
