use crate::brush::{BrushSet, Stroke};
use crate::config::SearchParams;
use fastrand::Rng;
use std::f32::consts::PI;

const POSITION_JITTER: f32 = 0.05;
const SIZE_JITTER: f32 = 0.25;
const ANGLE_JITTER: f32 = PI / 8.0;
const VALUE_JITTER: i16 = 24;
const OPACITY_JITTER: f32 = 0.15;
const MAX_ASPECT: f32 = 4.0;

pub fn random_stroke(rng: &mut Rng, brush: &BrushSet, color: bool) -> Stroke {
    let value = if color {
        [rng.u8(..), rng.u8(..), rng.u8(..)]
    } else {
        let v = rng.u8(..);
        [v, v, v]
    };
    Stroke {
        x: rng.f32(),
        y: rng.f32(),
        size: brush.min_size + rng.f32() * (brush.max_size - brush.min_size),
        angle: rng.f32() * PI,
        aspect: 1.0 + rng.f32() * (MAX_ASPECT - 1.0),
        value,
        opacity: 0.2 + rng.f32() * 0.8,
    }
}

pub fn random_strokes(rng: &mut Rng, brush: &BrushSet, count: usize, color: bool) -> Vec<Stroke> {
    (0..count).map(|_| random_stroke(rng, brush, color)).collect()
}

/// Nudges every attribute of `stroke` a little, keeping it inside its valid ranges.
pub fn perturb_stroke(rng: &mut Rng, stroke: &mut Stroke, brush: &BrushSet, color: bool) {
    stroke.x = (stroke.x + jitter(rng, POSITION_JITTER)).clamp(0.0, 1.0);
    stroke.y = (stroke.y + jitter(rng, POSITION_JITTER)).clamp(0.0, 1.0);
    stroke.size = brush.clamp_size(stroke.size * (1.0 + jitter(rng, SIZE_JITTER)));
    stroke.angle = (stroke.angle + jitter(rng, ANGLE_JITTER)).rem_euclid(PI);
    stroke.aspect = (stroke.aspect + jitter(rng, 0.5)).clamp(1.0, MAX_ASPECT);
    stroke.opacity = (stroke.opacity + jitter(rng, OPACITY_JITTER)).clamp(0.05, 1.0);

    if color {
        for c in stroke.value.iter_mut() {
            *c = shift_value(rng, *c);
        }
    } else {
        let v = shift_value(rng, stroke.value[0]);
        stroke.value = [v, v, v];
    }
}

/// Produces a mutated copy of `parent`. At least one change is always made.
pub fn mutate(
    rng: &mut Rng,
    parent: &[Stroke],
    brush: &BrushSet,
    params: &SearchParams,
    color: bool,
) -> Vec<Stroke> {
    let mut child = parent.to_vec();
    let mut changed = false;

    for stroke in child.iter_mut() {
        if rng.f32() < params.mutation_rate {
            perturb_stroke(rng, stroke, brush, color);
            changed = true;
        }
    }

    if child.len() < params.max_strokes && rng.f32() < params.add_stroke_chance {
        child.push(random_stroke(rng, brush, color));
        changed = true;
    }

    if child.len() > 1 && rng.f32() < params.add_stroke_chance * 0.5 {
        let idx = rng.usize(..child.len());
        child.remove(idx);
        changed = true;
    }

    // Paint order matters, so occasionally reorder.
    if child.len() > 1 && rng.f32() < params.add_stroke_chance * 0.5 {
        let a = rng.usize(..child.len());
        let b = rng.usize(..child.len());
        child.swap(a, b);
        changed = true;
    }

    if !changed {
        if child.is_empty() {
            child.push(random_stroke(rng, brush, color));
        } else {
            let idx = rng.usize(..child.len());
            perturb_stroke(rng, &mut child[idx], brush, color);
        }
    }

    child
}

#[inline]
fn jitter(rng: &mut Rng, amount: f32) -> f32 {
    (rng.f32() * 2.0 - 1.0) * amount
}

#[inline]
fn shift_value(rng: &mut Rng, v: u8) -> u8 {
    (v as i16 + rng.i16(-VALUE_JITTER..=VALUE_JITTER)).clamp(0, 255) as u8
}
