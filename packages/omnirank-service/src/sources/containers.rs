use omnirank_domain::command::has_extra_arguments;

use crate::{
	BoxFuture, Candidate, CandidatePayload, Error, FetchContext, Fetched, MatchKey, Result,
	SourceFetcher,
};

/// Container names, for the single argument of the container commands.
pub struct ContainerSource;
impl SourceFetcher for ContainerSource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			if has_extra_arguments(ctx.argument) {
				return Ok(Fetched::filtered(Vec::new(), ctx.argument));
			}

			let containers = ctx
				.host
				.containers
				.containers()
				.await
				.map_err(|err| Error::adapter("containers", err))?;
			let candidates = containers
				.into_iter()
				.map(|container| {
					let key = container.cookie_store_id.clone();
					let value = container.name.clone();
					let match_keys = vec![MatchKey::plain(&container.name)];

					Candidate::new(key, value, match_keys, CandidatePayload::Container(container))
				})
				.collect();

			Ok(Fetched::filtered(candidates, ctx.argument))
		})
	}
}
