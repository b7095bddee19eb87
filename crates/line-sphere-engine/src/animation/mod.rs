//! Frame-driven animation.
//!
//! The loop itself never blocks or sleeps. Each tick asks the presenter to
//! schedule the next one, so the host's refresh cadence sets the frame rate.

mod render_loop;

pub use render_loop::{FramePresenter, LoopState, RenderLoop};
