use std::collections::BTreeMap;

use serde::Deserialize;

/// Read-only configuration snapshot.
///
/// Every key is optional in the TOML source; a missing key falls back to the
/// default documented on its field.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub history: History,
	pub ranking: Ranking,
	/// Shortcut name to URL template. `%s` marks where the query goes.
	pub search_urls: BTreeMap<String, String>,
	pub fuzzy: Fuzzy,
	pub registry: Registry,
	pub completions: Completions,
	pub status: Status,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct History {
	/// Frecency half-life in days. Zero or less disables decay and ranks by raw visit count.
	pub half_life_days: f64,
	pub max_results: u32,
	/// URLs that are never offered, typically the new-tab page.
	pub excluded_urls: Vec<String>,
}
impl Default for History {
	fn default() -> Self {
		Self { half_life_days: 0.0, max_results: 50, excluded_urls: Vec::new() }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub bookmark_weight: f64,
	pub search_url_weight: f64,
	pub max_search_shortcuts: u32,
	pub max_top_sites_shortcuts: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			bookmark_weight: 100.0,
			search_url_weight: 150.0,
			max_search_shortcuts: 4,
			max_top_sites_shortcuts: 4,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fuzzy {
	/// Matcher scores strictly below this value hide the candidate.
	pub min_score: i64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// Refuse the whole candidate list.
	Reject,
	/// Keep the first candidate per key and log the rest.
	#[default]
	Dedupe,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Registry {
	pub on_duplicate: DuplicatePolicy,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Completions {
	pub history: SourceSettings,
	pub bookmarks: SourceSettings,
	pub tab_all: SourceSettings,
	pub sessions: SourceSettings,
	pub containers: SourceSettings,
	pub sanitise: SourceSettings,
}
impl Default for Completions {
	fn default() -> Self {
		Self {
			history: SourceSettings { autoselect: false, hide_on_empty: true },
			bookmarks: SourceSettings { autoselect: false, hide_on_empty: true },
			tab_all: SourceSettings::default(),
			sessions: SourceSettings::default(),
			containers: SourceSettings { autoselect: true, hide_on_empty: false },
			sanitise: SourceSettings { autoselect: true, hide_on_empty: false },
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
	pub autoselect: bool,
	pub hide_on_empty: bool,
}
impl Default for SourceSettings {
	fn default() -> Self {
		Self { autoselect: true, hide_on_empty: true }
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Status {
	pub pretty: bool,
	pub icons: StatusIcons,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StatusIcons {
	pub active: String,
	pub alternate: String,
	pub pinned: String,
	pub audible: String,
	pub muted: String,
	pub discarded: String,
	pub tab: String,
	pub window: String,
}
impl Default for StatusIcons {
	fn default() -> Self {
		Self {
			active: "\u{1F53A}".to_string(),
			alternate: "\u{1F53B}".to_string(),
			pinned: "\u{1F4CC}".to_string(),
			audible: "\u{1F50A}".to_string(),
			muted: "\u{1F507}".to_string(),
			discarded: "\u{1F4A4}".to_string(),
			tab: "\u{1F5CB}".to_string(),
			window: "\u{1F5D7}".to_string(),
		}
	}
}
