/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next redraw can render.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// The device cannot continue (commonly OOM).
    Fatal,
}
