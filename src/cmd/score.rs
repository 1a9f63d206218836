use crate::reports;
use clap::Args;
use finch::error::FinchResult;
use finch::fitness::{DifferenceKind, FitnessEvaluator};
use finch::raster::Image;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    pub candidate: PathBuf,
    pub target: PathBuf,

    #[arg(long, default_value = "absolute")]
    pub difference_method: String,

    /// Compare in RGB instead of grayscale
    #[arg(long, default_value_t = false)]
    pub color: bool,

    /// Print only the score
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// Both images are compared at their stored size; nothing is resized.
pub fn run(args: ScoreArgs) -> FinchResult<()> {
    let evaluator = FitnessEvaluator::new(DifferenceKind::from_name(&args.difference_method)?);

    let candidate = Image::load(&args.candidate, 0, args.color)?;
    let target = Image::load(&args.target, 0, args.color)?;
    debug!(
        "Comparing {} ({}) against {} ({})",
        args.candidate.display(),
        candidate.shape(),
        args.target.display(),
        target.shape()
    );

    let (_, score) = evaluator.compare(&candidate, &target)?;

    if args.quiet {
        println!("{:.6}", score);
    } else {
        reports::print_score(
            &args.candidate.display().to_string(),
            &args.target.display().to_string(),
            target.shape(),
            evaluator.method_name(),
            score,
        );
    }
    Ok(())
}
