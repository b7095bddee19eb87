use anyhow::Result;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the window runtime.
pub trait App {
    /// Called on every redraw of the window.
    ///
    /// The runtime does not schedule redraws on its own after the first one;
    /// an app that wants another frame calls [`WindowCtx::request_redraw`].
    ///
    /// An error stops the runtime, and [`Runtime::run`] returns it.
    ///
    /// [`WindowCtx::request_redraw`]: super::WindowCtx::request_redraw
    /// [`Runtime::run`]: crate::window::Runtime::run
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
