use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use omnirank_config::{Config, DuplicatePolicy, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let table = root
		.as_table_mut()
		.expect("Sample config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Sample config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("omnirank_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> omnirank_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = omnirank_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.history.half_life_days, 28.0);
	assert_eq!(cfg.search_urls.len(), 3);
	assert_eq!(cfg.registry.on_duplicate, DuplicatePolicy::Dedupe);
	assert!(!cfg.completions.sessions.autoselect);
	assert!(cfg.completions.tab_all.autoselect);
}

#[test]
fn empty_config_falls_back_to_defaults() {
	let cfg = load_payload(String::new()).expect("Empty config must load.");

	assert_eq!(cfg.history.half_life_days, 0.0);
	assert_eq!(cfg.history.max_results, 50);
	assert_eq!(cfg.ranking.bookmark_weight, 100.0);
	assert_eq!(cfg.ranking.search_url_weight, 150.0);
	assert_eq!(cfg.service.log_level, "info");
	assert!(cfg.search_urls.is_empty());
	assert!(!cfg.status.pretty);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("omnirank_config_test_does_not_exist.toml");
	let err = omnirank_config::load(&path).expect_err("Expected a read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn max_results_must_be_positive() {
	let err = load_payload(sample_with("history", "max_results", Value::Integer(0)))
		.expect_err("Expected max_results validation error.");

	assert!(
		err.to_string().contains("history.max_results must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn bookmark_weight_must_not_be_negative() {
	let err = load_payload(sample_with("ranking", "bookmark_weight", Value::Float(-1.0)))
		.expect_err("Expected bookmark_weight validation error.");

	assert!(
		err.to_string().contains("ranking.bookmark_weight must be zero or greater."),
		"Unexpected error: {err}"
	);
}

#[test]
fn search_url_weight_must_be_finite() {
	let mut cfg: Config = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse config.");

	cfg.ranking.search_url_weight = f64::INFINITY;

	let err = omnirank_config::validate(&cfg).expect_err("Expected finite validation error.");

	assert!(
		err.to_string().contains("ranking.search_url_weight must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn half_life_must_be_finite() {
	let mut cfg: Config = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse config.");

	cfg.history.half_life_days = f64::NAN;

	assert!(omnirank_config::validate(&cfg).is_err());

	cfg.history.half_life_days = -3.0;

	assert!(omnirank_config::validate(&cfg).is_ok(), "Negative half-life disables decay.");
}

#[test]
fn shortcut_names_must_not_contain_whitespace() {
	let err = load_payload(sample_with(
		"search_urls",
		"my search",
		Value::String("https://example.com/?q=%s".to_string()),
	))
	.expect_err("Expected shortcut name validation error.");

	assert!(matches!(err, Error::SearchTemplate { ref name, .. } if name == "my search"));
}

#[test]
fn shortcut_templates_must_form_urls() {
	let err = load_payload(sample_with(
		"search_urls",
		"broken",
		Value::String("not a url %s".to_string()),
	))
	.expect_err("Expected template validation error.");

	assert!(
		err.to_string().contains("template does not form a URL"),
		"Unexpected error: {err}"
	);
}

#[test]
fn unknown_duplicate_policy_is_rejected() {
	let payload = sample_with("registry", "on_duplicate", Value::String("explode".to_string()));
	let err = load_payload(payload).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn blank_excluded_urls_are_dropped() {
	let cfg = load_payload(sample_with(
		"history",
		"excluded_urls",
		Value::Array(vec![
			Value::String("  ".to_string()),
			Value::String("about:home".to_string()),
		]),
	))
	.expect("Config must load.");

	assert_eq!(cfg.history.excluded_urls, vec!["about:home".to_string()]);
}
