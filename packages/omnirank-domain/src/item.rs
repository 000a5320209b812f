use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a ranked candidate came from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
	History,
	Bookmark,
	Search,
	TopSite,
	Tab,
	Session,
}
impl Origin {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::History => "history",
			Self::Bookmark => "bookmark",
			Self::Search => "search",
			Self::TopSite => "topsite",
			Self::Tab => "tab",
			Self::Session => "session",
		}
	}
}

/// One record returned by a history, bookmark or top-sites query.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RawItem {
	#[serde(default)]
	pub title: String,
	pub url: String,
	#[serde(default, with = "crate::time_serde::seq", skip_serializing_if = "Option::is_none")]
	pub visit_timestamps: Option<Vec<OffsetDateTime>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub visit_count: Option<u32>,
	#[serde(default, with = "crate::time_serde::option", skip_serializing_if = "Option::is_none")]
	pub last_modified: Option<OffsetDateTime>,
	#[serde(default, with = "crate::time_serde::option", skip_serializing_if = "Option::is_none")]
	pub date_added: Option<OffsetDateTime>,
}
impl RawItem {
	pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
		Self { title: title.into(), url: url.into(), ..Default::default() }
	}
}

/// A raw item after scoring. Scores are always finite.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScoredCandidate {
	pub title: String,
	pub url: String,
	pub score: f64,
	pub origin: Option<Origin>,
}
impl ScoredCandidate {
	pub fn from_item(item: &RawItem, score: f64, origin: Origin) -> Self {
		Self { title: item.title.clone(), url: item.url.clone(), score, origin: Some(origin) }
	}
}

/// A configured search shortcut with its usage-weighted score.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchShortcut {
	/// The shortcut name, e.g. `g`.
	pub title: String,
	/// The URL template, still containing its placeholder.
	pub url: String,
	pub score: f64,
}
