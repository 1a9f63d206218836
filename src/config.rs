use crate::brush::BrushSet;
use crate::error::{FinchError, FinchResult};
use crate::fitness::DifferenceKind;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub target: TargetParams,
    #[command(flatten)]
    pub brush: BrushParams,
    #[command(flatten)]
    pub display: DisplayParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Candidates bred from the current best each generation
    #[arg(long, default_value_t = 32)]
    pub population_size: usize,
    /// Strokes in a freshly seeded specimen
    #[arg(long, default_value_t = 48)]
    pub stroke_count: usize,
    #[arg(long, default_value_t = 256)]
    pub max_strokes: usize,
    /// Per-stroke probability of being perturbed
    #[arg(long, default_value_t = 0.1)]
    pub mutation_rate: f32,
    #[arg(long, default_value_t = 0.05)]
    pub add_stroke_chance: f32,
    #[arg(long, default_value = "absolute")]
    pub difference_method: String,
    /// Stop the whole session after this many generations on one target
    #[arg(long)]
    pub max_generations: Option<u64>,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 5)]
    pub progress_interval_secs: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 32,
            stroke_count: 48,
            max_strokes: 256,
            mutation_rate: 0.1,
            add_stroke_chance: 0.05,
            difference_method: "absolute".to_string(),
            max_generations: None,
            seed: None,
            progress_interval_secs: 5,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Targets larger than this on either side are downscaled (0 keeps full size)
    #[arg(long, default_value_t = 256)]
    pub max_dimension: u32,
    /// Evolve in RGB instead of grayscale
    #[arg(long, default_value_t = false)]
    pub color: bool,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            max_dimension: 256,
            color: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushParams {
    #[arg(long, default_value = "round")]
    pub brush: String,
    #[arg(long, default_value_t = 2.0)]
    pub min_size: f32,
    #[arg(long, default_value_t = 24.0)]
    pub max_size: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            brush: "round".to_string(),
            min_size: 2.0,
            max_size: 24.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    #[arg(long, default_value_t = false)]
    pub fullscreen: bool,
    #[arg(long, default_value_t = 60.0)]
    pub max_fps: f64,
    /// Integer window magnification (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    pub window_scale: u32,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            fullscreen: false,
            max_fps: 60.0,
            window_scale: 2,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FinchResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every value the user typed on the command line over `self`,
    /// leaving file-provided values alone where clap only filled in a default.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(search.population_size);
        update_if_present!(search.stroke_count);
        update_if_present!(search.max_strokes);
        update_if_present!(search.mutation_rate);
        update_if_present!(search.add_stroke_chance);
        update_if_present!(search.difference_method);
        update_if_present!(search.max_generations);
        update_if_present!(search.seed);
        update_if_present!(search.progress_interval_secs);

        update_if_present!(target.max_dimension);
        update_if_present!(target.color);

        update_if_present!(brush.brush);
        update_if_present!(brush.min_size);
        update_if_present!(brush.max_size);

        update_if_present!(display.fullscreen);
        update_if_present!(display.max_fps);
        update_if_present!(display.window_scale);
    }

    pub fn difference_kind(&self) -> FinchResult<DifferenceKind> {
        DifferenceKind::from_name(&self.search.difference_method)
    }

    pub fn validate(&self) -> FinchResult<()> {
        let s = &self.search;
        if s.population_size == 0 {
            return Err(FinchError::Config("population_size must be at least 1".into()));
        }
        if s.stroke_count == 0 || s.stroke_count > s.max_strokes {
            return Err(FinchError::Config(format!(
                "stroke_count {} must be within 1..={}",
                s.stroke_count, s.max_strokes
            )));
        }
        for (name, p) in [
            ("mutation_rate", s.mutation_rate),
            ("add_stroke_chance", s.add_stroke_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FinchError::Config(format!("{} {} is outside [0, 1]", name, p)));
            }
        }
        self.difference_kind()?;

        BrushSet::from_params(&self.brush)?;

        let d = &self.display;
        if !(d.max_fps > 0.0 && d.max_fps.is_finite()) {
            return Err(FinchError::Config(format!("max_fps {} must be positive", d.max_fps)));
        }
        if ![1, 2, 4, 8].contains(&d.window_scale) {
            return Err(FinchError::Config(format!(
                "window_scale {} must be 1, 2, 4 or 8",
                d.window_scale
            )));
        }
        Ok(())
    }
}
