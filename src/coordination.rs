//! The record shared by the search loop and the render loop.
//!
//! Results travel one way over a single-producer/single-consumer channel as
//! immutable [`Snapshot`]s, so the reader always sees a specimen, its diff
//! image, its score and its target from the same evaluation. Control travels
//! through [`ControlFlags`], plain atomics with last-writer-wins semantics.

use crate::fitness::FitnessScore;
use crate::raster::Image;
use crate::specimen::Specimen;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

/// Image the search is trying to reproduce, with the name it is shown under.
#[derive(Debug)]
pub struct Target {
    pub id: String,
    pub image: Image,
}

impl Target {
    pub fn new(id: impl Into<String>, image: Image) -> Self {
        Self {
            id: id.into(),
            image,
        }
    }
}

/// One published improvement.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub target: Arc<Target>,
    pub specimen: Arc<Specimen>,
    pub score: FitnessScore,
    pub update_time_micros: u64,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct ControlFlags {
    lock_image: AtomicBool,
    stop: AtomicBool,
    next_image: AtomicBool,
}

impl ControlFlags {
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Flips the display lock and returns the new state.
    pub fn toggle_lock(&self) -> bool {
        !self.lock_image.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_locked(&self) -> bool {
        self.lock_image.load(Ordering::Acquire)
    }

    pub fn request_next_image(&self) {
        self.next_image.store(true, Ordering::Release);
    }

    pub fn next_image_requested(&self) -> bool {
        self.next_image.load(Ordering::Acquire)
    }

    /// Returns whether a new target was requested and clears the request.
    pub fn take_next_image_request(&self) -> bool {
        self.next_image.swap(false, Ordering::AcqRel)
    }
}

/// Creates the two ends of a drawing session.
pub fn session() -> (Publisher, Subscriber) {
    let flags = Arc::new(ControlFlags::default());
    let (tx, rx) = mpsc::channel();
    (
        Publisher {
            tx,
            flags: Arc::clone(&flags),
            published: 0,
        },
        Subscriber {
            rx,
            flags,
            latest: None,
        },
    )
}

/// Search-loop end.
pub struct Publisher {
    tx: Sender<Arc<Snapshot>>,
    flags: Arc<ControlFlags>,
    published: u64,
}

impl Publisher {
    /// Hands a snapshot to the render loop without blocking.
    ///
    /// Returns `false` once the render side is gone; the caller should treat
    /// that as a stop request, which is also recorded on the flags.
    pub fn publish(&mut self, snapshot: Snapshot) -> bool {
        match self.tx.send(Arc::new(snapshot)) {
            Ok(()) => {
                self.published += 1;
                true
            }
            Err(_) => {
                self.flags.request_stop();
                false
            }
        }
    }

    pub fn flags(&self) -> &Arc<ControlFlags> {
        &self.flags
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

/// Render-loop end.
pub struct Subscriber {
    rx: Receiver<Arc<Snapshot>>,
    flags: Arc<ControlFlags>,
    latest: Option<Arc<Snapshot>>,
}

impl Subscriber {
    /// Drains everything published since the last call, keeping only the
    /// newest snapshot. Never blocks. Returns `true` if anything arrived.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => {
                    self.latest = Some(snapshot);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    pub fn image_available(&self) -> bool {
        self.latest.is_some()
    }

    pub fn latest(&self) -> Option<&Arc<Snapshot>> {
        self.latest.as_ref()
    }

    pub fn flags(&self) -> &Arc<ControlFlags> {
        &self.flags
    }
}
