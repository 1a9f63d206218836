use crate::brush::BrushSet;
use crate::config::{Config, SearchParams, TargetParams};
use crate::coordination::{ControlFlags, Publisher, Snapshot, Target};
use crate::error::{FinchError, FinchResult};
use crate::fitness::{FitnessEvaluator, FitnessScore};
use crate::optimizer::Lineage;
use crate::raster::Image;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

enum TargetSource {
    File(PathBuf),
    Loaded(Arc<Target>),
}

/// Targets to draw, handed out in order and wrapping around.
pub struct TargetQueue {
    sources: Vec<TargetSource>,
    params: TargetParams,
    cursor: usize,
}

impl TargetQueue {
    pub fn from_paths(paths: &[PathBuf], params: TargetParams) -> FinchResult<Self> {
        if paths.is_empty() {
            return Err(FinchError::Config("at least one target image is required".into()));
        }
        Ok(Self {
            sources: paths.iter().cloned().map(TargetSource::File).collect(),
            params,
            cursor: 0,
        })
    }

    pub fn from_targets(targets: Vec<Arc<Target>>) -> FinchResult<Self> {
        if targets.is_empty() {
            return Err(FinchError::Config("at least one target image is required".into()));
        }
        Ok(Self {
            sources: targets.into_iter().map(TargetSource::Loaded).collect(),
            params: TargetParams::default(),
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns the next target that loads, skipping (and logging) broken files.
    pub fn next_target(&mut self) -> FinchResult<Arc<Target>> {
        let mut last_err = None;
        for _ in 0..self.sources.len() {
            let idx = self.cursor;
            self.cursor = (self.cursor + 1) % self.sources.len();

            match &self.sources[idx] {
                TargetSource::Loaded(target) => return Ok(Arc::clone(target)),
                TargetSource::File(path) => match load_target(path, &self.params) {
                    Ok(target) => return Ok(Arc::new(target)),
                    Err(e) => {
                        warn!("Skipping target {:?}: {}", path, e);
                        last_err = Some(e);
                    }
                },
            }
        }
        Err(last_err.unwrap_or_else(|| FinchError::Config("no target could be loaded".into())))
    }
}

fn load_target(path: &Path, params: &TargetParams) -> FinchResult<Target> {
    let image = Image::load(path, params.max_dimension, params.color)?;
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Target::new(id, image))
}

/// How a target's session came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Stopped,
    NextImage,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub target_id: String,
    pub generations: u64,
    pub improvements: u64,
    pub best_score: FitnessScore,
    pub strokes: usize,
    pub elapsed: Duration,
    pub end: SessionEnd,
}

/// Evolves specimens toward the current target and publishes every
/// improvement. Runs until the stop flag is raised, from either side.
pub struct SearchLoop {
    evaluator: FitnessEvaluator,
    brush: Arc<BrushSet>,
    params: SearchParams,
    targets: TargetQueue,
}

impl SearchLoop {
    pub fn new(config: &Config, targets: TargetQueue) -> FinchResult<Self> {
        config.validate()?;
        let evaluator = FitnessEvaluator::new(config.difference_kind()?);
        let brush = Arc::new(BrushSet::from_params(&config.brush)?);
        Ok(Self {
            evaluator,
            brush,
            params: config.search.clone(),
            targets,
        })
    }

    pub fn brush(&self) -> &Arc<BrushSet> {
        &self.brush
    }

    /// Drives sessions until stopped. On failure the stop flag is raised so
    /// the render loop does not wait on a search that is gone.
    pub fn run(mut self, mut publisher: Publisher) -> FinchResult<Vec<SessionSummary>> {
        let flags = Arc::clone(publisher.flags());
        let result = self.run_sessions(&mut publisher, &flags);
        if let Err(e) = &result {
            error!("Search loop failed: {}", e);
        }
        flags.request_stop();
        result
    }

    fn run_sessions(
        &mut self,
        publisher: &mut Publisher,
        flags: &ControlFlags,
    ) -> FinchResult<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        let mut session_index = 0u64;

        loop {
            // A stop raised before or between sessions means no more work at all.
            if flags.should_stop() {
                break;
            }
            let target = self.targets.next_target()?;
            let seed = self
                .params
                .seed
                .map(|s| s.wrapping_add(session_index.wrapping_mul(1000)));
            let summary = self.run_target(target, seed, publisher, flags)?;
            let end = summary.end;
            summaries.push(summary);
            session_index += 1;

            if end == SessionEnd::Stopped {
                break;
            }
        }
        Ok(summaries)
    }

    fn run_target(
        &self,
        target: Arc<Target>,
        seed: Option<u64>,
        publisher: &mut Publisher,
        flags: &ControlFlags,
    ) -> FinchResult<SessionSummary> {
        info!(
            "🎯 Target '{}' ({}) with brush '{}'",
            target.id,
            target.image.shape(),
            self.brush.name
        );

        let start = Instant::now();
        let mut lineage = Lineage::seed(
            Arc::clone(&self.brush),
            &self.evaluator,
            &target.image,
            &self.params,
            seed,
        )?;
        // Stop may have arrived while seeding; nothing gets published then.
        let mut alive =
            !flags.should_stop() && publisher.publish(self.snapshot(&target, &lineage, start));

        let report_every = Duration::from_secs(self.params.progress_interval_secs.max(1));
        let mut last_report = Instant::now();
        let mut gens_since_report = 0u64;

        let end = loop {
            if !alive || flags.should_stop() {
                break SessionEnd::Stopped;
            }
            if flags.take_next_image_request() {
                info!("Switching away from '{}'", target.id);
                break SessionEnd::NextImage;
            }
            if let Some(limit) = self.params.max_generations {
                if lineage.generation >= limit {
                    info!("Reached {} generations on '{}'", limit, target.id);
                    flags.request_stop();
                    break SessionEnd::Stopped;
                }
            }

            let gen_start = Instant::now();
            if lineage.evolve(&self.evaluator, &target.image, &self.params)? {
                debug!(
                    "Gen {} improved to {:.6} ({} strokes)",
                    lineage.generation,
                    lineage.best_score,
                    lineage.best.strokes().len()
                );
                alive = publisher.publish(self.snapshot(&target, &lineage, gen_start));
            }
            gens_since_report += 1;

            let since = last_report.elapsed();
            if since >= report_every {
                info!(
                    "Gen {:7} | Score: {:.6} | Strokes: {:4} | {:.1} gen/s",
                    lineage.generation,
                    lineage.best_score,
                    lineage.best.strokes().len(),
                    gens_since_report as f64 / since.as_secs_f64()
                );
                last_report = Instant::now();
                gens_since_report = 0;
            }
        };

        Ok(SessionSummary {
            target_id: target.id.clone(),
            generations: lineage.generation,
            improvements: lineage.improvements,
            best_score: lineage.best_score,
            strokes: lineage.best.strokes().len(),
            elapsed: start.elapsed(),
            end,
        })
    }

    fn snapshot(&self, target: &Arc<Target>, lineage: &Lineage, started: Instant) -> Snapshot {
        Snapshot {
            target: Arc::clone(target),
            specimen: Arc::clone(&lineage.best),
            score: lineage.best_score,
            update_time_micros: started.elapsed().as_micros() as u64,
            generation: lineage.generation,
        }
    }
}
