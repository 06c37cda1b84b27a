use std::io::Write;

use sparkmart_core::{ConfigError, PersonaType, SimConfig};
use tempfile::NamedTempFile;

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn partial_file_fills_in_defaults() {
    let file = yaml_file(
        r#"
clock:
  seed: 42
spawner:
  max_customers: 5
personas:
  - name: Rusher
    persona_type: quick_shopper
    max_list_size: 2
"#,
    );

    let config = SimConfig::load(file.path()).expect("load");
    assert_eq!(config.clock.seed, 42);
    assert_eq!(config.clock.tick_seconds, 0.1);
    assert_eq!(config.spawner.max_customers, 5);
    assert_eq!(config.personas.len(), 1);
    assert_eq!(config.personas[0].persona_type, PersonaType::QuickShopper);
    assert_eq!(config.personas[0].min_list_size, 1);
    assert_eq!(config.store.shelves.len(), 6);
}

#[test]
fn default_config_survives_a_yaml_round_trip() {
    let yaml = SimConfig::default().to_yaml().expect("yaml");
    let file = yaml_file(&yaml);
    assert_eq!(SimConfig::load(file.path()).expect("load"), SimConfig::default());
}

#[test]
fn invalid_values_are_reported_with_the_path() {
    let file = yaml_file("clock:\n  tick_seconds: 0.0\n");
    let err = SimConfig::load(file.path()).expect_err("zero tick");

    assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NonPositiveTick(_))
    ));
}

#[test]
fn non_finite_time_scale_is_rejected() {
    let file = yaml_file("clock:\n  time_scale: .nan\n");
    let err = SimConfig::load(file.path()).expect_err("nan scale");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::TimeScale(scale)) if scale.is_nan()
    ));

    let mut config = SimConfig::default();
    config.clock.time_scale = f32::INFINITY;
    assert_eq!(config.validate(), Err(ConfigError::TimeScale(f32::INFINITY)));
}

#[test]
fn malformed_yaml_is_an_error() {
    let file = yaml_file("clock: [not, a, map]\n");
    let err = SimConfig::load(file.path()).expect_err("bad yaml");
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = SimConfig::load_or_default(&dir.path().join("sparkmart.yaml")).expect("default");
    assert_eq!(config, SimConfig::default());

    assert!(SimConfig::load(&dir.path().join("sparkmart.yaml")).is_err());
}
