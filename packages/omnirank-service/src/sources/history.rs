use crate::{BoxFuture, Candidate, FetchContext, Fetched, Result, SourceFetcher, adapter};

/// History, bookmarks and search shortcuts for `open` and friends.
///
/// The host already matched the query, so nothing is fuzzy filtered here. An empty query shows
/// top sites instead.
pub struct HistorySource;
impl SourceFetcher for HistorySource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			let pages = if ctx.argument.is_empty() {
				adapter::top_sites(ctx.host, ctx.cfg).await?
			} else {
				adapter::combined_history_bookmarks(ctx.host, ctx.cfg, ctx.argument, ctx.now).await?
			};

			Ok(Fetched::prefiltered(pages.into_iter().map(Candidate::page).collect()))
		})
	}
}
