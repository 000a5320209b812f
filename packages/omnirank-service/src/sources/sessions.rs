use omnirank_domain::sessions::build_session_entry;

use crate::{
	BoxFuture, Candidate, CandidatePayload, Error, FetchContext, Fetched, MatchKey, Result,
	SourceFetcher,
};

/// Recently closed tabs and windows, for `undo`.
pub struct SessionSource;
impl SourceFetcher for SessionSource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			let records = ctx
				.host
				.sessions
				.recently_closed()
				.await
				.map_err(|err| Error::adapter("sessions", err))?;
			let candidates = records
				.iter()
				.filter_map(|record| build_session_entry(record, ctx.now, &ctx.cfg.status))
				.map(|entry| {
					let key = format!("session:{}", entry.session_id);
					let value = entry.session_id.clone();
					let match_keys = entry.match_keys.iter().map(MatchKey::plain).collect();

					Candidate::new(key, value, match_keys, CandidatePayload::Session(entry))
				})
				.collect();

			Ok(Fetched::filtered(candidates, ctx.argument))
		})
	}
}
