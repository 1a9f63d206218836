pub mod mutation;
pub mod runner;

pub use self::runner::{SearchLoop, SessionSummary, TargetQueue};

use crate::brush::BrushSet;
use crate::config::SearchParams;
use crate::error::FinchResult;
use crate::fitness::{FitnessEvaluator, FitnessScore};
use crate::raster::Image;
use crate::specimen::Specimen;
use rayon::prelude::*;
use std::sync::Arc;

/// (1+λ) hill climber on a single target: each generation breeds λ mutants
/// of the current best and keeps the fittest if it strictly improves.
pub struct Lineage {
    pub brush: Arc<BrushSet>,
    pub best: Arc<Specimen>,
    pub best_score: FitnessScore,
    pub generation: u64,
    pub improvements: u64,
    pub color: bool,
    pub rng: fastrand::Rng,
}

impl Lineage {
    /// Seeds a lineage with a random specimen, already evaluated.
    pub fn seed(
        brush: Arc<BrushSet>,
        evaluator: &FitnessEvaluator,
        target: &Image,
        params: &SearchParams,
        seed: Option<u64>,
    ) -> FinchResult<Self> {
        let mut rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };
        let color = target.channels() == 3;

        let strokes = mutation::random_strokes(&mut rng, &brush, params.stroke_count, color);
        let mut specimen = Specimen::render(Arc::clone(&brush), strokes, target.shape())?;
        let best_score = evaluator.evaluate(&mut specimen, target)?;

        Ok(Self {
            brush,
            best: Arc::new(specimen),
            best_score,
            generation: 0,
            improvements: 0,
            color,
            rng,
        })
    }

    /// Runs one generation. Returns `true` when the best specimen changed.
    pub fn evolve(
        &mut self,
        evaluator: &FitnessEvaluator,
        target: &Image,
        params: &SearchParams,
    ) -> FinchResult<bool> {
        self.generation += 1;

        let seeds: Vec<u64> = (0..params.population_size)
            .map(|_| self.rng.u64(..))
            .collect();
        let parent = self.best.strokes();
        let brush = &self.brush;
        let color = self.color;

        let offspring: Vec<(FitnessScore, Specimen)> = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = fastrand::Rng::with_seed(seed);
                let strokes = mutation::mutate(&mut rng, parent, brush, params, color);
                let mut child = Specimen::render(Arc::clone(brush), strokes, target.shape())?;
                let score = evaluator.evaluate(&mut child, target)?;
                Ok((score, child))
            })
            .collect::<FinchResult<_>>()?;

        // Sequential pick keeps ties on the lowest index, independent of scheduling.
        let mut winner: Option<(FitnessScore, Specimen)> = None;
        for (score, child) in offspring {
            if winner.as_ref().map_or(true, |(best, _)| score < *best) {
                winner = Some((score, child));
            }
        }

        match winner {
            Some((score, child)) if score < self.best_score => {
                self.best = Arc::new(child);
                self.best_score = score;
                self.improvements += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
