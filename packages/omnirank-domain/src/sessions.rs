use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use omnirank_config::Status;

use crate::tabs::TabRecord;

/// A recently closed tab or window.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SessionRecord {
	Tab {
		session_id: String,
		#[serde(with = "crate::time_serde")]
		last_modified: OffsetDateTime,
		tab: TabRecord,
	},
	Window {
		session_id: String,
		#[serde(with = "crate::time_serde")]
		last_modified: OffsetDateTime,
		tabs: Vec<TabRecord>,
	},
}
impl SessionRecord {
	pub fn session_id(&self) -> &str {
		match self {
			Self::Tab { session_id, .. } | Self::Window { session_id, .. } => session_id,
		}
	}

	pub fn last_modified(&self) -> OffsetDateTime {
		match self {
			Self::Tab { last_modified, .. } | Self::Window { last_modified, .. } => *last_modified,
		}
	}

	/// The tab that represents this session: the tab itself, or a window's most recent tab.
	pub fn primary_tab(&self) -> Option<&TabRecord> {
		match self {
			Self::Tab { tab, .. } => Some(tab),
			Self::Window { tabs, .. } => tabs.iter().max_by_key(|tab| tab.last_accessed),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum AgeUnit {
	Seconds,
	Minutes,
	Hours,
	Days,
}
impl AgeUnit {
	pub fn suffix(self) -> char {
		match self {
			Self::Seconds => 's',
			Self::Minutes => 'm',
			Self::Hours => 'h',
			Self::Days => 'd',
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionEntry {
	pub session_id: String,
	pub title: String,
	pub url: String,
	/// `T` for a tab, `W` for a window.
	pub status: String,
	pub status_display: String,
	pub age: (i64, AgeUnit),
	/// The URL for a single tab, or "N more tab(s)" for a larger window.
	pub detail: String,
	pub match_keys: Vec<String>,
}

/// Coarse age of `last_modified` relative to `now`, escalating through s, m, h and d.
pub fn relative_age(last_modified: OffsetDateTime, now: OffsetDateTime) -> (i64, AgeUnit) {
	let mut amount = round_div((now - last_modified).whole_milliseconds(), 1_000);
	let mut unit = AgeUnit::Seconds;

	for (next, limit, divisor) in
		[(AgeUnit::Minutes, 60, 60), (AgeUnit::Hours, 60, 60), (AgeUnit::Days, 24, 24)]
	{
		if amount.abs() <= limit {
			break;
		}

		unit = next;
		amount = round_div(amount as i128, divisor);
	}

	(amount, unit)
}

pub fn build_session_entry(
	record: &SessionRecord,
	now: OffsetDateTime,
	status: &Status,
) -> Option<SessionEntry> {
	let tab = record.primary_tab()?;
	let (plain, icon) = match record {
		SessionRecord::Tab { .. } => ("T", &status.icons.tab),
		SessionRecord::Window { .. } => ("W", &status.icons.window),
	};
	let detail = match record {
		SessionRecord::Window { tabs, .. } if tabs.len() >= 2 => {
			let more = tabs.len() - 1;

			format!("{more} more tab{}", if more > 1 { "s" } else { "" })
		},
		_ => tab.url.clone(),
	};
	let mut match_keys = Vec::new();
	let status_display = if status.pretty {
		match_keys.push(icon.clone());

		icon.clone()
	} else {
		plain.to_string()
	};

	match_keys.push(plain.to_string());
	match_keys.push(tab.title.clone());
	match_keys.push(tab.url.clone());

	Some(SessionEntry {
		session_id: record.session_id().to_string(),
		title: tab.title.clone(),
		url: tab.url.clone(),
		status: plain.to_string(),
		status_display,
		age: relative_age(record.last_modified(), now),
		detail,
		match_keys,
	})
}

fn round_div(value: i128, divisor: i128) -> i64 {
	let quotient = value as f64 / divisor as f64;

	quotient.round() as i64
}

#[cfg(test)]
mod tests {
	use time::{Duration, macros::datetime};

	use super::*;

	#[test]
	fn ages_escalate_by_magnitude() {
		let now = datetime!(2026-03-01 12:00 UTC);

		assert_eq!(relative_age(now - Duration::seconds(42), now), (42, AgeUnit::Seconds));
		assert_eq!(relative_age(now - Duration::seconds(60), now), (60, AgeUnit::Seconds));
		assert_eq!(relative_age(now - Duration::minutes(5), now), (5, AgeUnit::Minutes));
		assert_eq!(relative_age(now - Duration::hours(3), now), (3, AgeUnit::Hours));
		assert_eq!(relative_age(now - Duration::hours(24), now), (24, AgeUnit::Hours));
		assert_eq!(relative_age(now - Duration::days(3), now), (3, AgeUnit::Days));
	}
}
