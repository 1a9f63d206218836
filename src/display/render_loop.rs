use crate::coordination::{Snapshot, Subscriber};
use crate::display::overlay::{self, OverlayInfo};
use crate::display::pacing::FramePacer;
use crate::display::surface::Surface;
use crate::display::view::{Command, ViewMode};
use crate::raster::{Canvas, Image};
use std::sync::Arc;
use std::thread;
use strum_macros::Display;
use tracing::{debug, info, warn};

/// Channel layout the display expects.
pub const DISPLAY_CHANNELS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExitReason {
    #[strum(to_string = "stop requested")]
    StopRequested,
    #[strum(to_string = "escape pressed")]
    Escape,
    #[strum(to_string = "surface closed")]
    SurfaceClosed,
    #[strum(to_string = "surface lost")]
    SurfaceLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(ExitReason),
}

/// Frame-rate-capped loop that shows the latest published specimen and turns
/// key presses into view changes and control flags.
pub struct RenderLoop<S: Surface> {
    surface: S,
    subscriber: Subscriber,
    pacer: FramePacer,
    view: ViewMode,
    debug: bool,
    frozen: Option<Arc<Snapshot>>,
    frames: u64,
}

impl<S: Surface> RenderLoop<S> {
    pub fn new(surface: S, subscriber: Subscriber, pacer: FramePacer) -> Self {
        Self {
            surface,
            subscriber,
            pacer,
            view: ViewMode::Normal,
            debug: false,
            frozen: None,
            frames: 0,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }

    /// Runs until something asks it to exit, pacing every iteration. Always
    /// leaves the stop flag raised so the search loop winds down too.
    pub fn run(&mut self) -> ExitReason {
        let reason = loop {
            if let Step::Exit(reason) = self.step() {
                break reason;
            }
            if let Some(rest) = self.pacer.end_frame() {
                thread::sleep(rest);
            }
        };
        self.subscriber.flags().request_stop();
        info!("Render loop finished after {} frames: {}", self.frames, reason);
        reason
    }

    /// One iteration without pacing.
    pub fn step(&mut self) -> Step {
        let flags = Arc::clone(self.subscriber.flags());
        if flags.should_stop() {
            return Step::Exit(ExitReason::StopRequested);
        }
        if !self.surface.is_open() {
            return Step::Exit(ExitReason::SurfaceClosed);
        }

        self.subscriber.refresh();
        let Some(latest) = self.subscriber.latest().cloned() else {
            self.surface.idle();
            return Step::Continue;
        };

        let locked = flags.is_locked();
        let shown = if locked {
            Arc::clone(self.frozen.get_or_insert(latest))
        } else {
            self.frozen = None;
            latest
        };

        let frame = self.compose(&shown, locked);
        if let Err(e) = self.surface.present(&frame) {
            warn!("Display surface lost: {}", e);
            return Step::Exit(ExitReason::SurfaceLost);
        }
        self.frames += 1;

        if let Some(key) = self.surface.poll_key() {
            match Command::from_key(key) {
                Some(Command::Show(mode)) => self.view = mode,
                Some(Command::ToggleDebug) => self.debug = !self.debug,
                Some(Command::ToggleLock) => {
                    let now_locked = flags.toggle_lock();
                    // Freeze what is on screen now, not whatever arrives next.
                    self.frozen = now_locked.then(|| Arc::clone(&shown));
                    debug!("Display lock {}", if now_locked { "on" } else { "off" });
                }
                Some(Command::NextImage) => {
                    info!("Next target requested");
                    flags.request_next_image();
                }
                Some(Command::Quit) => return Step::Exit(ExitReason::Escape),
                None => {}
            }
        }
        Step::Continue
    }

    fn select(&self, snapshot: &Snapshot) -> Image {
        let specimen = &snapshot.specimen;
        match self.view {
            ViewMode::Normal => specimen.cached_image().clone(),
            ViewMode::Diff => match specimen.diff_image() {
                Some(diff) => diff
                    .to_channels(DISPLAY_CHANNELS)
                    .unwrap_or_else(|_| diff.clone()),
                None => specimen.cached_image().clone(),
            },
            ViewMode::Original => snapshot.target.image.clone(),
        }
    }

    /// Builds the frame to present. Anything drawn goes onto a private copy;
    /// the images inside the snapshot are only ever read.
    fn compose(&self, snapshot: &Snapshot, locked: bool) -> Image {
        let frame = self.select(snapshot);
        if !(self.debug || locked) {
            return frame;
        }
        if !self.debug {
            return Canvas::copy_of(&frame).into_image();
        }

        let info = OverlayInfo {
            target_id: &snapshot.target.id,
            brush_name: &snapshot.specimen.brush().name,
            update_time_micros: snapshot.update_time_micros,
            score: snapshot.score,
            fps: self.pacer.fps_label(),
        };
        overlay::annotate(&frame, &info, locked)
    }
}
