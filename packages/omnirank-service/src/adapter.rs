//! Host adapters for the URL sources.
//!
//! Each function performs the host calls for one kind of record and hands the results to the
//! pure merge and scoring code in `omnirank_domain`. Records with unparsable URLs never leave
//! this module.

use time::OffsetDateTime;
use tokio::task::JoinSet;

use omnirank_config::Config;
use omnirank_domain::{Origin, RawItem, ScoredCandidate, SearchShortcut, frecency, merge};

use crate::{Error, Host, Result};

/// History matching `query`, deduplicated and ranked by frecency.
pub async fn history(
	host: &Host,
	cfg: &Config,
	query: &str,
	now: OffsetDateTime,
) -> Result<Vec<ScoredCandidate>> {
	let half_life = cfg.history.half_life_days;
	let items = host
		.history
		.search(query, Some(cfg.history.max_results), Some(OffsetDateTime::UNIX_EPOCH))
		.await
		.map_err(|err| Error::adapter("history", err))?;
	let items =
		merge::dedupe_history(retain_valid_urls("history", items), &cfg.history.excluded_urls);
	let visits = lookup_visits(host, &items, half_life).await?;
	let mut out = Vec::with_capacity(items.len());

	for (item, looked_up) in items.iter().zip(visits) {
		let score = match (&item.visit_timestamps, looked_up) {
			(Some(attached), _) => frecency::score(item, half_life, attached, now),
			(None, Some(looked_up)) => frecency::score(item, half_life, &looked_up, now),
			(None, None) => frecency::score(item, half_life, &[], now),
		};

		out.push(ScoredCandidate::from_item(item, score, Origin::History));
	}

	merge::sort_by_score(&mut out);

	Ok(out)
}

/// Visit times for every item that came without them, fetched concurrently.
///
/// The result lines up with `items`. Nothing is fetched when decay is disabled.
async fn lookup_visits(
	host: &Host,
	items: &[RawItem],
	half_life: f64,
) -> Result<Vec<Option<Vec<OffsetDateTime>>>> {
	let mut out = vec![None; items.len()];

	if !(half_life > 0.0) {
		return Ok(out);
	}

	let mut lookups = JoinSet::new();

	for (idx, item) in items.iter().enumerate() {
		if item.visit_timestamps.is_some() {
			continue;
		}

		let history = host.history.clone();
		let url = item.url.clone();

		lookups.spawn(async move { (idx, history.visits(&url).await) });
	}

	while let Some(joined) = lookups.join_next().await {
		let (idx, visits) = joined.map_err(|err| Error::Adapter {
			backend: "history".to_string(),
			message: err.to_string(),
		})?;

		out[idx] = Some(visits.map_err(|err| Error::adapter("history", err))?);
	}

	Ok(out)
}

/// Bookmarks matching `query`, newest first, without repeated `(title, url)` pairs.
pub async fn bookmarks(host: &Host, query: &str) -> Result<Vec<RawItem>> {
	let items =
		host.bookmarks.search(query).await.map_err(|err| Error::adapter("bookmarks", err))?;

	Ok(merge::dedupe_bookmarks(retain_valid_urls("bookmarks", items)))
}

/// Configured shortcuts whose name starts with `query`, ranked by how often they were used.
pub async fn search_shortcuts(
	host: &Host,
	cfg: &Config,
	query: &str,
) -> Result<Vec<SearchShortcut>> {
	let mut out = Vec::new();

	for (name, template) in cfg.search_urls.iter().filter(|(name, _)| name.starts_with(query)) {
		let text = merge::search_history_text(template);
		let hits = host
			.history
			.search(&text, None, Some(OffsetDateTime::UNIX_EPOCH))
			.await
			.map_err(|err| Error::adapter("history", err))?;

		out.push(SearchShortcut {
			title: name.clone(),
			url: template.clone(),
			score: merge::search_shortcut_score(cfg.ranking.search_url_weight, hits.len()),
		});
	}

	Ok(merge::rank_search_shortcuts(out))
}

/// What the history section shows before anything is typed.
pub async fn top_sites(host: &Host, cfg: &Config) -> Result<Vec<ScoredCandidate>> {
	let mut shortcuts = search_shortcuts(host, cfg, "").await?;

	shortcuts.truncate(cfg.ranking.max_top_sites_shortcuts as usize);

	let sites = host.history.top_sites().await.map_err(|err| Error::adapter("top_sites", err))?;

	Ok(merge::combine_top_sites(
		shortcuts,
		retain_valid_urls("top_sites", sites),
		&cfg.history.excluded_urls,
	))
}

/// History, bookmarks and search shortcuts for `query`, merged into one ranked list.
pub async fn combined_history_bookmarks(
	host: &Host,
	cfg: &Config,
	query: &str,
	now: OffsetDateTime,
) -> Result<Vec<ScoredCandidate>> {
	let (history, bookmarks) =
		tokio::join!(history(host, cfg, query, now), bookmarks(host, query));
	let (history, bookmarks) = (history?, bookmarks?);
	let mut shortcuts = search_shortcuts(host, cfg, query).await?;

	shortcuts.truncate(cfg.ranking.max_search_shortcuts as usize);

	Ok(merge::combine(history, bookmarks, shortcuts, cfg.ranking.bookmark_weight))
}

pub fn check_url(url: &str) -> Result<()> {
	if merge::is_valid_url(url) {
		Ok(())
	} else {
		Err(Error::MalformedUrl { url: url.to_string() })
	}
}

fn retain_valid_urls(backend: &str, mut items: Vec<RawItem>) -> Vec<RawItem> {
	items.retain(|item| match check_url(&item.url) {
		Ok(()) => true,
		Err(err) => {
			tracing::warn!(backend, error = %err, "Dropping record with malformed URL.");

			false
		},
	});

	items
}
