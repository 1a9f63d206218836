#![allow(dead_code)]

use finch::brush::{BrushKind, BrushSet};
use finch::coordination::{Snapshot, Target};
use finch::display::{Key, Surface};
use finch::error::{FinchError, FinchResult};
use finch::fitness::FitnessEvaluator;
use finch::raster::{Image, Shape};
use finch::specimen::Specimen;
use std::collections::VecDeque;
use std::sync::Arc;

pub fn gray(width: u32, height: u32, value: u8) -> Image {
    Image::filled(Shape::new(width, height, 1), value).unwrap()
}

pub fn rgb(width: u32, height: u32, value: u8) -> Image {
    Image::filled(Shape::new(width, height, 3), value).unwrap()
}

pub fn round_brush() -> Arc<BrushSet> {
    Arc::new(BrushSet::new(BrushKind::Round, 1.0, 4.0))
}

/// A specimen whose rendering is `image`, already scored against `target`.
pub fn scored_specimen(image: Image, target: &Image) -> (Specimen, f64) {
    let mut specimen = Specimen::from_image(round_brush(), image);
    let score = FitnessEvaluator::default()
        .evaluate(&mut specimen, target)
        .unwrap();
    (specimen, score)
}

pub fn snapshot_of(target: &Arc<Target>, image: Image, generation: u64) -> Snapshot {
    let (specimen, score) = scored_specimen(image, &target.image);
    Snapshot {
        target: Arc::clone(target),
        specimen: Arc::new(specimen),
        score,
        update_time_micros: 1_000,
        generation,
    }
}

pub fn target(id: &str, image: Image) -> Arc<Target> {
    Arc::new(Target::new(id, image))
}

/// Surface driven by a script: keys are handed out one per poll and every
/// presented frame is kept for inspection.
#[derive(Default)]
pub struct ScriptedSurface {
    pub frames: Vec<Image>,
    pub keys: VecDeque<Key>,
    pub closed: bool,
    pub fail_present: bool,
    pub idles: u64,
}

impl ScriptedSurface {
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> &Image {
        self.frames.last().expect("no frame presented")
    }
}

impl Surface for ScriptedSurface {
    fn is_open(&self) -> bool {
        !self.closed
    }

    fn present(&mut self, frame: &Image) -> FinchResult<()> {
        if self.fail_present {
            return Err(FinchError::Display("scripted failure".into()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }

    fn idle(&mut self) {
        self.idles += 1;
    }
}
