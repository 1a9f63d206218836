use std::time::{Duration, Instant};

pub const DEFAULT_MAX_FPS: f64 = 60.0;

/// Caps the render loop's frame rate and remembers how long the last frame took.
#[derive(Debug)]
pub struct FramePacer {
    min_frame: Duration,
    frame_start: Instant,
    last_frame_duration: Option<Duration>,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FPS)
    }
}

impl FramePacer {
    /// Pacer capped at `max_fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `max_fps` is zero, negative or NaN. `Config::validate`
    /// rejects such values before a pacer is built from configuration.
    pub fn new(max_fps: f64) -> Self {
        Self {
            min_frame: Duration::from_secs_f64(1.0 / max_fps),
            frame_start: Instant::now(),
            last_frame_duration: None,
        }
    }

    pub fn min_frame(&self) -> Duration {
        self.min_frame
    }

    /// Work plus planned sleep of the previous frame.
    pub fn last_frame_duration(&self) -> Option<Duration> {
        self.last_frame_duration
    }

    /// How long to sleep after a frame that took `elapsed`, if at all.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.min_frame
            .checked_sub(elapsed)
            .filter(|rest| !rest.is_zero())
    }

    /// Closes the current frame and reports the sleep needed to respect the
    /// cap. Sleeping is left to the caller; the next frame is timed from the
    /// end of that sleep.
    pub fn end_frame(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let work = now.saturating_duration_since(self.frame_start);
        let rest = self.remaining(work);
        let planned = rest.unwrap_or_default();

        self.frame_start = now + planned;
        self.last_frame_duration = Some(work + planned);
        rest
    }

    /// Instantaneous rate from the previous frame, `"inf"` before the first
    /// frame or after a zero-length one.
    pub fn fps_label(&self) -> String {
        match self.last_frame_duration {
            Some(d) if !d.is_zero() => format!("{}", (1.0 / d.as_secs_f64()).round() as u64),
            _ => "inf".to_string(),
        }
    }
}
