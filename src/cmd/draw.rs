use crate::reports;
use clap::{ArgMatches, Args};
use finch::config::Config;
use finch::coordination::{self, Subscriber};
use finch::display::{ExitReason, FramePacer, NullSurface, RenderLoop, Surface, WindowSurface};
use finch::error::{FinchError, FinchResult};
use finch::optimizer::{SearchLoop, TargetQueue};
use finch::raster::Image;
use std::path::PathBuf;
use std::thread;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct DrawArgs {
    /// Target images, cycled through with the `n` key
    #[arg(required = true)]
    pub targets: Vec<PathBuf>,

    #[command(flatten)]
    pub config: Config,

    /// JSON file with base settings; flags given on the command line win
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Run without a window until the generation limit or Ctrl-C
    #[arg(long, default_value_t = false)]
    pub headless: bool,
}

/// File settings first, then whatever the user typed on top.
fn resolve_config(args: &DrawArgs, matches: Option<&ArgMatches>) -> FinchResult<Config> {
    let config = match &args.config_file {
        Some(path) => {
            info!("📂 Loading settings from {}", path.display());
            let mut file_config = Config::load_from_file(path)?;
            if let Some(matches) = matches {
                file_config.merge_from_cli(&args.config, matches);
            }
            file_config
        }
        None => args.config.clone(),
    };
    config.validate()?;
    Ok(config)
}

pub fn run(args: DrawArgs, matches: Option<&ArgMatches>) -> FinchResult<()> {
    let config = resolve_config(&args, matches)?;

    println!("\n🐦 Initializing finch...");
    println!(
        "🖌️  Brush '{}' | population {} | {} seed strokes",
        config.brush.brush, config.search.population_size, config.search.stroke_count
    );

    let targets = TargetQueue::from_paths(&args.targets, config.target.clone())?;
    let search = SearchLoop::new(&config, targets)?;
    let (publisher, subscriber) = coordination::session();

    let search_handle = thread::Builder::new()
        .name("search".to_string())
        .spawn(move || search.run(publisher))?;

    let pacer = FramePacer::new(config.display.max_fps);
    let reason = if args.headless {
        if config.search.max_generations.is_none() {
            warn!("Headless without --max-generations runs until interrupted");
        }
        drive(NullSurface::default(), subscriber, pacer)
    } else {
        match open_window(&args, &config) {
            Ok(surface) => drive(surface, subscriber, pacer),
            Err(e) => {
                warn!("⚠️  Could not open a window: {}", e);
                subscriber.flags().request_stop();
                ExitReason::SurfaceLost
            }
        }
    };
    info!("Display finished: {}", reason);

    let summaries = search_handle
        .join()
        .map_err(|_| FinchError::Search("search thread panicked".into()))??;

    reports::print_session_summary(&summaries);
    Ok(())
}

fn drive<S: Surface>(surface: S, subscriber: Subscriber, pacer: FramePacer) -> ExitReason {
    RenderLoop::new(surface, subscriber, pacer).run()
}

/// The window is sized from the first target that loads.
fn open_window(args: &DrawArgs, config: &Config) -> FinchResult<WindowSurface> {
    let first = args
        .targets
        .iter()
        .find_map(|path| {
            Image::load(path, config.target.max_dimension, config.target.color).ok()
        })
        .ok_or_else(|| FinchError::InvalidImage("no target image could be loaded".into()))?;
    WindowSurface::open(first.width(), first.height(), &config.display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, Parser};
    use std::io::Write;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        args: DrawArgs,
    }

    fn parse(argv: &[&str]) -> (DrawArgs, ArgMatches) {
        let matches = Harness::command().get_matches_from(argv);
        let harness = Harness::from_arg_matches(&matches).unwrap();
        (harness.args, matches)
    }

    #[test]
    fn command_line_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"search": {{"population_size": 8, "stroke_count": 5}}, "brush": {{"brush": "square"}}}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let (args, matches) = parse(&[
            "finch",
            "a.png",
            "--config",
            &path,
            "--population-size",
            "4",
        ]);
        let config = resolve_config(&args, Some(&matches)).unwrap();

        assert_eq!(config.search.population_size, 4);
        assert_eq!(config.search.stroke_count, 5);
        assert_eq!(config.brush.brush, "square");
    }

    #[test]
    fn defaults_without_file() {
        let (args, matches) = parse(&["finch", "a.png"]);
        let config = resolve_config(&args, Some(&matches)).unwrap();
        assert_eq!(config.search.population_size, 32);
        assert_eq!(config.display.max_fps, 60.0);
    }
}
