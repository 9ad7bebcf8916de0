use crate::correspondence::Particle;
use tracing::debug;

/// Callback fired exactly once per [ParticleAnimator::start] when progress
/// reaches 1.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Lifecycle of a [ParticleAnimator] run.
///
/// `Completed` is terminal for a run but not for the animator: calling
/// [ParticleAnimator::start] again restarts cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// No run in progress.
    Idle,
    /// A run is in progress; each [ParticleAnimator::advance_frame] call
    /// renders one frame.
    Running,
    /// The last run reached progress 1 and fired its completion callback.
    Completed,
}

/// Time-driven particle animation over an owned RGBA frame buffer.
///
/// The animator is a poll-driven state machine: the host's frame scheduler
/// calls [advance_frame](ParticleAnimator::advance_frame) once per frame with a
/// monotonically increasing timestamp, and the animator interpolates every
/// particle between its endpoints with a cubic ease-in-out curve and
/// rasterizes the result. Frames are strictly sequential; cancellation via
/// [stop](ParticleAnimator::stop) is a state check at the top of the next
/// frame, never a mid-frame interrupt.
///
/// Positions are always recomputed from the eased progress, never advanced
/// incrementally, so rendering the same timestamp twice produces the same
/// frame.
pub struct ParticleAnimator {
    particles: Vec<Particle>,
    canvas_width: usize,
    canvas_height: usize,
    duration_ms: f64,
    start_timestamp: Option<f64>,
    frame_buffer: Vec<u8>,
    state: AnimatorState,
    on_complete: Option<CompletionCallback>,
}

impl ParticleAnimator {
    /// Creates an idle animator with no particles and a zero-sized canvas.
    ///
    /// # Parameters
    /// - `duration_ms`: Length of a run in milliseconds. A non-positive value
    ///   makes the first frame of a run jump straight to progress 1.
    pub fn new(duration_ms: f64) -> ParticleAnimator {
        ParticleAnimator {
            particles: Vec::new(),
            canvas_width: 0,
            canvas_height: 0,
            duration_ms,
            start_timestamp: None,
            frame_buffer: Vec::new(),
            state: AnimatorState::Idle,
            on_complete: None,
        }
    }

    /// Replaces the particle list and output dimensions.
    ///
    /// Valid in any state. Calling this while running changes what subsequent
    /// frames render but does not reset progress.
    pub fn set_particles(&mut self, particles: Vec<Particle>, width: usize, height: usize) {
        self.particles = particles;
        self.canvas_width = width;
        self.canvas_height = height;
        self.frame_buffer = vec![0u8; width * height * 4];
    }

    /// Begins a run: records `now_ms` as the start timestamp and arms the
    /// completion callback.
    ///
    /// The host should follow up with one [advance_frame](Self::advance_frame)
    /// call per frame. Restarting from `Completed` (or mid-run) is clean: the
    /// previous callback is discarded and progress restarts at 0.
    pub fn start(&mut self, now_ms: f64, on_complete: Option<CompletionCallback>) {
        self.start_timestamp = Some(now_ms);
        self.on_complete = on_complete;
        self.state = AnimatorState::Running;
        debug!(duration_ms = self.duration_ms, particles = self.particles.len(), "animation started");
    }

    /// Renders the frame for `now_ms` and advances the state machine.
    ///
    /// A no-op unless running (this check is the cancellation point). Progress
    /// is `clamp(elapsed / duration, 0, 1)`; when it reaches 1 the completion
    /// callback fires exactly once and the state becomes `Completed`.
    ///
    /// # Returns
    /// The state after the frame.
    pub fn advance_frame(&mut self, now_ms: f64) -> AnimatorState {
        if self.state != AnimatorState::Running {
            return self.state;
        }
        let start = match self.start_timestamp {
            Some(start) => start,
            None => return self.state,
        };

        let progress = if self.duration_ms <= 0.0 {
            // Degenerate duration: jump to the end instead of dividing by zero.
            1.0
        } else {
            ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
        };

        self.render(ease_in_out_cubic(progress));

        if progress >= 1.0 {
            self.state = AnimatorState::Completed;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete();
            }
            debug!("animation completed");
        }
        self.state
    }

    /// Cancels any run and returns to `Idle` without firing the completion
    /// callback. Valid in any state and idempotent.
    pub fn stop(&mut self) {
        if self.state == AnimatorState::Running {
            debug!("animation stopped");
        }
        self.state = AnimatorState::Idle;
        self.start_timestamp = None;
        self.on_complete = None;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// The most recently rasterized frame, row-major RGBA at
    /// [frame_dimensions](Self::frame_dimensions).
    pub fn frame(&self) -> &[u8] {
        &self.frame_buffer
    }

    /// `(width, height)` of the frame buffer.
    pub fn frame_dimensions(&self) -> (usize, usize) {
        (self.canvas_width, self.canvas_height)
    }

    /// Rasterizes every particle at eased progress `t`.
    ///
    /// The buffer is cleared to transparent black first; in-bounds particles
    /// are written with full alpha in list order, so later particles overwrite
    /// earlier ones that land on the same pixel (last-write-wins).
    fn render(&mut self, t: f64) {
        self.frame_buffer.fill(0);
        let width = self.canvas_width;
        let height = self.canvas_height;

        for p in &mut self.particles {
            let x = (p.start_x as f64 + (p.end_x as f64 - p.start_x as f64) * t).round();
            let y = (p.start_y as f64 + (p.end_y as f64 - p.start_y as f64) * t).round();
            p.current_x = x as i32;
            p.current_y = y as i32;

            if p.current_x >= 0
                && (p.current_x as usize) < width
                && p.current_y >= 0
                && (p.current_y as usize) < height
            {
                let index = (p.current_y as usize * width + p.current_x as usize) * 4;
                self.frame_buffer[index] = p.r;
                self.frame_buffer[index + 1] = p.g;
                self.frame_buffer[index + 2] = p.b;
                self.frame_buffer[index + 3] = 255;
            }
        }
    }
}

/// Cubic ease-in-out: `4t³` below the midpoint, `1 - (-2t+2)³/2` above.
/// Continuous, with `ease(0) = 0`, `ease(0.5) = 0.5`, `ease(1) = 1`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
