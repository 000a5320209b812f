use omnirank_domain::tabs::{TabSnapshotInput, build_tab_snapshot};

use crate::{
	BoxFuture, Candidate, CandidatePayload, Error, FetchContext, Fetched, MatchKey, Result,
	SourceFetcher,
};

/// Every open tab, for `taball` and `tabgrab`.
pub struct TabAllSource;
impl SourceFetcher for TabAllSource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			let host = ctx.host;
			let (tabs, windows, current_window_id, containers) = tokio::join!(
				host.tabs.tabs(),
				host.tabs.windows(),
				host.tabs.current_window_id(),
				host.containers.containers(),
			);
			// Tabs stay usable without container names.
			let containers = containers.unwrap_or_else(|err| {
				tracing::warn!(error = %err, "Container lookup failed; showing tabs without them.");

				Vec::new()
			});
			let input = TabSnapshotInput {
				tabs: tabs.map_err(|err| Error::adapter("tabs", err))?,
				windows: windows.map_err(|err| Error::adapter("windows", err))?,
				containers,
				current_window_id: current_window_id
					.map_err(|err| Error::adapter("windows", err))?,
				exclude_current_window: ctx.command.excludes_current_window,
			};
			let candidates = build_tab_snapshot(input, &ctx.cfg.status)
				.into_iter()
				.map(|entry| {
					let key = format!("tab:{}", entry.tab.id);
					let value = entry.value.clone();
					let match_keys = entry.match_keys.iter().map(MatchKey::plain).collect();

					Candidate::new(key, value, match_keys, CandidatePayload::Tab(entry))
				})
				.collect();

			Ok(Fetched::filtered(candidates, ctx.argument))
		})
	}
}
