//! Multi-source merge of history, bookmarks and search shortcuts.
//!
//! The merge is keyed by URL and is asymmetric:
//! - bookmarks seed the map and keep their titles,
//! - history adds its score onto an existing entry,
//! - search shortcuts overwrite whatever sits at their URL.
//!
//! Ordering ties fall back to first-insertion order, so every sort here must stay stable.

use std::{
	cmp::Ordering,
	collections::{HashMap, HashSet},
};

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::item::{Origin, RawItem, ScoredCandidate, SearchShortcut};

/// Text used to count how often a shortcut was used: the template with its placeholder blanked.
pub fn search_history_text(template: &str) -> String {
	template.split(omnirank_config::QUERY_PLACEHOLDER).collect::<Vec<_>>().join(" ")
}

pub fn search_shortcut_score(weight: f64, history_hits: usize) -> f64 {
	weight + history_hits as f64
}

/// Orders shortcuts by score, then alphabetically by name.
pub fn rank_search_shortcuts(mut shortcuts: Vec<SearchShortcut>) -> Vec<SearchShortcut> {
	shortcuts.sort_by(|left, right| {
		cmp_f64_desc(left.score, right.score).then_with(|| left.title.cmp(&right.title))
	});

	shortcuts
}

/// Drops repeated `(title, url)` bookmarks, keeping the most recently added, newest first.
///
/// Bookmarks without `date_added` sort after dated ones.
pub fn dedupe_bookmarks(mut bookmarks: Vec<RawItem>) -> Vec<RawItem> {
	bookmarks.sort_by(|left, right| right.date_added.cmp(&left.date_added));

	let mut seen = HashSet::new();

	bookmarks.retain(|bookmark| seen.insert((bookmark.title.clone(), bookmark.url.clone())));

	bookmarks
}

/// Collapses history entries sharing a URL, keeping the longer title.
///
/// Entries in `excluded_urls` are removed. The first-seen position of each URL is kept.
pub fn dedupe_history(history: Vec<RawItem>, excluded_urls: &[String]) -> Vec<RawItem> {
	let mut out: Vec<RawItem> = Vec::with_capacity(history.len());
	let mut by_url: HashMap<String, usize> = HashMap::new();

	for page in history {
		if excluded_urls.iter().any(|url| url == &page.url) {
			continue;
		}

		match by_url.get(&page.url) {
			Some(&idx) =>
				if title_len(&out[idx].title) < title_len(&page.title) {
					out[idx] = page;
				},
			None => {
				by_url.insert(page.url.clone(), out.len());
				out.push(page);
			},
		}
	}

	out
}

/// Merges scored history, deduplicated bookmarks and ranked shortcuts into one list.
///
/// The result holds at most one candidate per URL and is sorted by descending score.
pub fn combine(
	history: Vec<ScoredCandidate>,
	bookmarks: Vec<RawItem>,
	search_shortcuts: Vec<SearchShortcut>,
	bookmark_base_score: f64,
) -> Vec<ScoredCandidate> {
	let mut merged = UrlMap::default();

	// A URL bookmarked twice keeps its first position and its last title.
	for bookmark in &bookmarks {
		merged.replace(ScoredCandidate::from_item(bookmark, bookmark_base_score, Origin::Bookmark));
	}
	for page in history {
		match merged.get_mut(&page.url) {
			Some(existing) => existing.score += page.score,
			None => merged.insert(ScoredCandidate { origin: Some(Origin::History), ..page }),
		}
	}
	// Shortcuts replace rather than add.
	for shortcut in search_shortcuts {
		merged.replace(ScoredCandidate {
			title: shortcut.title,
			url: shortcut.url,
			score: shortcut.score,
			origin: Some(Origin::Search),
		});
	}

	let mut out = merged.into_vec();

	sort_by_score(&mut out);

	out
}

/// Builds the list shown for an empty query: shortcuts first, then the host's top sites.
pub fn combine_top_sites(
	search_shortcuts: Vec<SearchShortcut>,
	top_sites: Vec<RawItem>,
	excluded_urls: &[String],
) -> Vec<ScoredCandidate> {
	let mut merged = UrlMap::default();

	for shortcut in search_shortcuts {
		merged.replace(ScoredCandidate {
			title: shortcut.title,
			url: shortcut.url,
			score: shortcut.score,
			origin: Some(Origin::Search),
		});
	}
	for site in top_sites {
		if excluded_urls.iter().any(|url| url == &site.url) || merged.contains(&site.url) {
			continue;
		}

		merged.insert(ScoredCandidate::from_item(&site, 0.0, Origin::TopSite));
	}

	merged.into_vec()
}

/// Stable descending sort by score.
pub fn sort_by_score(candidates: &mut [ScoredCandidate]) {
	candidates.sort_by(|left, right| cmp_f64_desc(left.score, right.score));
}

pub fn is_valid_url(raw: &str) -> bool {
	Url::parse(raw).is_ok()
}

pub fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn title_len(title: &str) -> usize {
	title.graphemes(true).count()
}

/// Insertion-ordered map from URL to candidate. Replacing keeps the original slot.
#[derive(Default)]
struct UrlMap {
	entries: Vec<ScoredCandidate>,
	index: HashMap<String, usize>,
}
impl UrlMap {
	fn contains(&self, url: &str) -> bool {
		self.index.contains_key(url)
	}

	fn get_mut(&mut self, url: &str) -> Option<&mut ScoredCandidate> {
		let idx = *self.index.get(url)?;

		self.entries.get_mut(idx)
	}

	fn insert(&mut self, candidate: ScoredCandidate) {
		self.index.insert(candidate.url.clone(), self.entries.len());
		self.entries.push(candidate);
	}

	fn replace(&mut self, candidate: ScoredCandidate) {
		match self.index.get(&candidate.url) {
			Some(&idx) => self.entries[idx] = candidate,
			None => self.insert(candidate),
		}
	}

	fn into_vec(self) -> Vec<ScoredCandidate> {
		self.entries
	}
}
