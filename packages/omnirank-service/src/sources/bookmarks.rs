use omnirank_domain::{Origin, ScoredCandidate};

use crate::{BoxFuture, Candidate, FetchContext, Fetched, Result, SourceFetcher, adapter};

/// Bookmarks alone, newest first.
pub struct BookmarkSource;
impl SourceFetcher for BookmarkSource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			let weight = ctx.cfg.ranking.bookmark_weight;
			let candidates = adapter::bookmarks(ctx.host, ctx.argument)
				.await?
				.into_iter()
				.map(|bookmark| {
					// The same URL may be bookmarked under several titles.
					let key = format!("{}\n{}", bookmark.title, bookmark.url);
					let page = ScoredCandidate::from_item(&bookmark, weight, Origin::Bookmark);

					Candidate { key, ..Candidate::page(page) }
				})
				.collect();

			Ok(Fetched::prefiltered(candidates))
		})
	}
}
