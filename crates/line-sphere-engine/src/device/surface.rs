use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks a surface format.
///
/// With `prefer_srgb` an sRGB 8-bit format is chosen when offered; otherwise the
/// first non-sRGB format is preferred so shader output lands unconverted.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
        return Some(first);
    }

    Some(
        caps.formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(first),
    )
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Falls back to FIFO, which every surface supports.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Whether a size can back a surface configuration.
#[inline]
pub(crate) fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

pub(crate) fn map_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    fn caps(formats: &[F]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
            alpha_modes: vec![
                wgpu::CompositeAlphaMode::Opaque,
                wgpu::CompositeAlphaMode::PreMultiplied,
            ],
            ..Default::default()
        }
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
        assert_eq!(choose_surface_format(&caps(&[]), false), None);
    }

    #[test]
    fn linear_preferred_by_default() {
        let c = caps(&[F::Bgra8UnormSrgb, F::Bgra8Unorm]);
        assert_eq!(choose_surface_format(&c, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn srgb_preferred_when_asked() {
        let c = caps(&[F::Bgra8Unorm, F::Rgba8UnormSrgb]);
        assert_eq!(choose_surface_format(&c, true), Some(F::Rgba8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        assert_eq!(choose_surface_format(&caps(&[F::Bgra8UnormSrgb]), false), Some(F::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&caps(&[F::Rgba16Float]), true), Some(F::Rgba16Float));
    }

    #[test]
    fn alpha_mode_honors_supported_request() {
        let c = caps(&[F::Bgra8Unorm]);
        let requested = Some(wgpu::CompositeAlphaMode::PreMultiplied);
        assert_eq!(choose_alpha_mode(&c, requested), wgpu::CompositeAlphaMode::PreMultiplied);
    }

    #[test]
    fn alpha_mode_ignores_unsupported_request() {
        let c = caps(&[F::Bgra8Unorm]);
        let requested = Some(wgpu::CompositeAlphaMode::PostMultiplied);
        assert_eq!(choose_alpha_mode(&c, requested), wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let c = caps(&[F::Bgra8Unorm]);
        assert_eq!(choose_present_mode(&c, wgpu::PresentMode::Mailbox), wgpu::PresentMode::Mailbox);
        assert_eq!(choose_present_mode(&c, wgpu::PresentMode::Immediate), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn zero_sized_is_not_drawable() {
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(!is_drawable(PhysicalSize::new(800, 0)));
        assert!(is_drawable(PhysicalSize::new(1, 1)));
    }

    #[test]
    fn surface_errors_map_to_actions() {
        use wgpu::SurfaceError as E;
        assert_eq!(map_surface_error(&E::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&E::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&E::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(map_surface_error(&E::Other), SurfaceErrorAction::SkipFrame);
        assert_eq!(map_surface_error(&E::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
