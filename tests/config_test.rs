use finch::config::{Config, SearchParams};
use finch::error::FinchError;
use finch::fitness::DifferenceKind;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_json(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{}", body).unwrap();
    file
}

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!(config.difference_kind().unwrap(), DifferenceKind::Absolute);
    assert_eq!(config.display.max_fps, 60.0);
    assert_eq!(config.brush.brush, "round");
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let file = write_json(
        r#"{
            "search": { "population_size": 12, "seed": 7 },
            "target": { "color": true },
            "display": { "max_fps": 30.0 }
        }"#,
    );
    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.search.population_size, 12);
    assert_eq!(config.search.seed, Some(7));
    assert_eq!(config.search.stroke_count, SearchParams::default().stroke_count);
    assert!(config.target.color);
    assert_eq!(config.target.max_dimension, 256);
    assert_eq!(config.display.max_fps, 30.0);
    config.validate().unwrap();
}

#[test]
fn malformed_file_is_a_json_error() {
    let file = write_json("{ not json");
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(FinchError::Json(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        Config::load_from_file("/definitely/not/here.json"),
        Err(FinchError::Io(_))
    ));
}

#[test]
fn unknown_difference_method_fails_validation() {
    let mut config = Config::default();
    config.search.difference_method = "squared".into();
    assert!(matches!(
        config.validate(),
        Err(FinchError::UnknownDifferenceMethod(_))
    ));
}

#[test]
fn out_of_range_values_fail_validation() {
    let cases: Vec<fn(&mut Config)> = vec![
        |c| c.search.population_size = 0,
        |c| c.search.stroke_count = 0,
        |c| c.search.stroke_count = c.search.max_strokes + 1,
        |c| c.search.mutation_rate = 1.5,
        |c| c.search.add_stroke_chance = -0.1,
        |c| c.brush.min_size = 0.0,
        |c| c.brush.min_size = c.brush.max_size + 1.0,
        |c| c.display.max_fps = 0.0,
        |c| c.display.max_fps = f64::INFINITY,
    ];

    for (i, mutate) in cases.into_iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(FinchError::Config(_))),
            "case {} should fail",
            i
        );
    }
}

#[test]
fn unknown_brush_is_rejected() {
    let mut config = Config::default();
    config.brush.brush = "sponge".into();
    assert!(matches!(config.validate(), Err(FinchError::Config(m)) if m.contains("sponge")));
}
