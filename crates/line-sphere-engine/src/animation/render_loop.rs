use glam::Mat4;

use crate::transform::Transform;

/// Sink for the per-tick side effects of a [`RenderLoop`].
///
/// The window runtime implements this by requesting a redraw and drawing
/// through the frame context. Tests implement it by recording calls.
pub trait FramePresenter {
    /// Schedules the next tick with the host.
    fn request_next_frame(&mut self);

    /// Uploads `mvp` and issues the draw call.
    fn present(&mut self, mvp: &Mat4);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// Constructed; no tick has run.
    Idle,
    /// Ticking. There is no way back to `Idle`.
    Running,
}

/// Owns the transform state and advances it once per presented frame.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    state: LoopState,
    transform: Transform,
    ticks: u64,
}

impl RenderLoop {
    pub fn new(transform: Transform) -> Self {
        Self {
            state: LoopState::Idle,
            transform,
            ticks: 0,
        }
    }

    /// Transitions `Idle -> Running`. Later calls are no-ops.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            log::debug!("render loop running");
            self.state = LoopState::Running;
        }
    }

    /// Runs one frame.
    ///
    /// Order: schedule next frame, rotate the model, recompute the combined
    /// matrix, present. A tick on an idle loop starts it first.
    pub fn tick<P>(&mut self, presenter: &mut P)
    where
        P: FramePresenter + ?Sized,
    {
        self.start();

        presenter.request_next_frame();

        self.transform.advance();
        let mvp = self.transform.update();

        presenter.present(&mvp);

        self.ticks = self.ticks.wrapping_add(1);
        log::trace!("tick {}", self.ticks);
    }

    /// Ticks only while the target can show a frame.
    ///
    /// A skipped tick neither rotates the model nor schedules another frame,
    /// so the loop pauses until the host asks for a frame again. Returns
    /// whether the tick ran.
    pub fn tick_if_drawable<P>(&mut self, drawable: bool, presenter: &mut P) -> bool
    where
        P: FramePresenter + ?Sized,
    {
        if !drawable {
            log::trace!("target not drawable; pausing at tick {}", self.ticks);
            return false;
        }
        self.tick(presenter);
        true
    }

    /// Drives `n` ticks synchronously.
    pub fn run_ticks<P>(&mut self, n: u64, presenter: &mut P)
    where
        P: FramePresenter + ?Sized,
    {
        for _ in 0..n {
            self.tick(presenter);
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformConfig;

    #[derive(Debug, PartialEq)]
    enum Call {
        Request,
        Present(Mat4),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl FramePresenter for Recorder {
        fn request_next_frame(&mut self) {
            self.calls.push(Call::Request);
        }

        fn present(&mut self, mvp: &Mat4) {
            self.calls.push(Call::Present(*mvp));
        }
    }

    fn render_loop() -> RenderLoop {
        RenderLoop::new(Transform::new(&TransformConfig::default(), 4.0 / 3.0))
    }

    #[test]
    fn starts_idle() {
        let rl = render_loop();
        assert_eq!(rl.state(), LoopState::Idle);
        assert_eq!(rl.ticks(), 0);
    }

    #[test]
    fn start_is_one_way() {
        let mut rl = render_loop();
        rl.start();
        rl.start();
        assert_eq!(rl.state(), LoopState::Running);
    }

    #[test]
    fn first_tick_starts_loop() {
        let mut rl = render_loop();
        rl.tick(&mut Recorder::default());
        assert_eq!(rl.state(), LoopState::Running);
        assert_eq!(rl.ticks(), 1);
    }

    #[test]
    fn tick_requests_next_frame_before_presenting() {
        let mut rl = render_loop();
        let mut rec = Recorder::default();
        rl.run_ticks(3, &mut rec);

        assert_eq!(rec.calls.len(), 6);
        for pair in rec.calls.chunks_exact(2) {
            assert_eq!(pair[0], Call::Request);
            assert!(matches!(pair[1], Call::Present(_)));
        }
    }

    #[test]
    fn presented_matrix_is_current_mvp() {
        let mut rl = render_loop();
        let mut rec = Recorder::default();
        rl.run_ticks(5, &mut rec);

        let t = rl.transform();
        let expected = t.projection() * (t.view() * t.model());
        assert_eq!(rec.calls.last(), Some(&Call::Present(expected)));
    }

    #[test]
    fn every_tick_presents_a_new_matrix() {
        let mut rl = render_loop();
        let mut rec = Recorder::default();
        rl.run_ticks(4, &mut rec);

        let mvps: Vec<Mat4> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Present(m) => Some(*m),
                Call::Request => None,
            })
            .collect();
        assert_eq!(mvps.len(), 4);
        for w in mvps.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn hidden_target_pauses_without_rescheduling() {
        let mut rl = render_loop();
        let mut rec = Recorder::default();
        rl.run_ticks(2, &mut rec);
        let model = rl.transform().model();

        assert!(!rl.tick_if_drawable(false, &mut rec));
        assert!(!rl.tick_if_drawable(false, &mut rec));
        assert_eq!(rec.calls.len(), 4);
        assert_eq!(rl.ticks(), 2);
        assert_eq!(rl.transform().model(), model);

        assert!(rl.tick_if_drawable(true, &mut rec));
        assert_eq!(rl.ticks(), 3);
        assert_eq!(rec.calls.len(), 6);
        assert_eq!(rec.calls[4], Call::Request);
    }

    #[test]
    fn model_after_k_ticks_matches_direct_rotation() {
        let mut rl = render_loop();
        rl.run_ticks(100, &mut Recorder::default());
        assert_eq!(rl.ticks(), 100);
        assert!(rl.transform().model().abs_diff_eq(Mat4::from_rotation_y(2.0), 1e-4));
    }

    #[test]
    fn zero_ticks_keeps_initial_model() {
        let mut rl = render_loop();
        rl.run_ticks(0, &mut Recorder::default());
        assert_eq!(rl.state(), LoopState::Idle);
        assert_eq!(rl.transform().model(), Mat4::IDENTITY);
    }

    #[test]
    fn works_through_trait_object() {
        let mut rl = render_loop();
        let mut rec = Recorder::default();
        let presenter: &mut dyn FramePresenter = &mut rec;
        rl.tick(presenter);
        assert_eq!(rec.calls.len(), 2);
    }
}
