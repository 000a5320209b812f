mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Completions, Config, DuplicatePolicy, Fuzzy, History, Ranking, Registry, Service,
	SourceSettings, Status, StatusIcons,
};

use std::{fs, path::Path};

use url::Url;

/// Placeholder substituted into search URL templates.
pub const QUERY_PLACEHOLDER: &str = "%s";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !cfg.history.half_life_days.is_finite() {
		return Err(Error::Validation {
			message: "history.half_life_days must be a finite number.".to_string(),
		});
	}
	if cfg.history.max_results == 0 {
		return Err(Error::Validation {
			message: "history.max_results must be greater than zero.".to_string(),
		});
	}

	for (path, value) in [
		("ranking.bookmark_weight", cfg.ranking.bookmark_weight),
		("ranking.search_url_weight", cfg.ranking.search_url_weight),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{path} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{path} must be zero or greater.") });
		}
	}

	for (name, template) in &cfg.search_urls {
		validate_search_url(name, template)?;
	}

	Ok(())
}

fn validate_search_url(name: &str, template: &str) -> Result<()> {
	if name.is_empty() {
		return Err(Error::SearchTemplate {
			name: name.to_string(),
			message: "shortcut name must be non-empty.".to_string(),
		});
	}
	if name.chars().any(char::is_whitespace) {
		return Err(Error::SearchTemplate {
			name: name.to_string(),
			message: "shortcut name must not contain whitespace.".to_string(),
		});
	}

	let probe = template.replace(QUERY_PLACEHOLDER, "query");

	Url::parse(&probe).map_err(|err| Error::SearchTemplate {
		name: name.to_string(),
		message: format!("template does not form a URL: {err}."),
	})?;

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.history.excluded_urls.retain(|url| !url.trim().is_empty());

	for template in cfg.search_urls.values_mut() {
		let trimmed = template.trim();

		if trimmed.len() != template.len() {
			*template = trimmed.to_string();
		}
	}
}
