//! Fetchers for each completion section, and the standard set of sections.

pub mod bookmarks;
pub mod containers;
pub mod history;
pub mod sanitise;
pub mod sessions;
pub mod tabs;

use std::sync::Arc;

use omnirank_config::{Config, SourceSettings};
use omnirank_domain::command::{CommandTable, SourceKind};

use crate::{CompletionSource, SourceFetcher};

pub fn fetcher_for(kind: SourceKind) -> Arc<dyn SourceFetcher> {
	match kind {
		SourceKind::History => Arc::new(history::HistorySource),
		SourceKind::Bookmarks => Arc::new(bookmarks::BookmarkSource),
		SourceKind::TabAll => Arc::new(tabs::TabAllSource),
		SourceKind::Sessions => Arc::new(sessions::SessionSource),
		SourceKind::Containers => Arc::new(containers::ContainerSource),
		SourceKind::Sanitise => Arc::new(sanitise::SanitiseSource),
	}
}

pub fn settings_for(cfg: &Config, kind: SourceKind) -> SourceSettings {
	let completions = &cfg.completions;

	match kind {
		SourceKind::History => completions.history,
		SourceKind::Bookmarks => completions.bookmarks,
		SourceKind::TabAll => completions.tab_all,
		SourceKind::Sessions => completions.sessions,
		SourceKind::Containers => completions.containers,
		SourceKind::Sanitise => completions.sanitise,
	}
}

/// One source per kind, in display order.
pub fn standard(cfg: &Config, table: &CommandTable) -> Vec<CompletionSource> {
	SourceKind::ALL
		.into_iter()
		.map(|kind| {
			CompletionSource::new(
				kind,
				table,
				fetcher_for(kind),
				settings_for(cfg, kind),
				cfg.registry.on_duplicate,
			)
		})
		.collect()
}
