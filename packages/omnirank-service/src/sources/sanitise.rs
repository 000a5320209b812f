use omnirank_domain::command::{ArgumentShape, split_repeated};

use crate::{
	BoxFuture, Candidate, CandidatePayload, FetchContext, Fetched, MatchKey, Result, SourceFetcher,
};

const DATA_KINDS: [(&str, &str); 12] = [
	("all", "Deletes everything, including any saved usernames and passwords."),
	("cache", "The browser's cache."),
	("commandline", "In-memory command line history."),
	("cookies", "Cookies acquired while browsing."),
	("downloads", "The download history."),
	("formData", "Saved form data, for autocomplete."),
	("history", "The browsing history."),
	("localStorage", "Local storage data."),
	("passwords", "Saved passwords, for autocomplete."),
	("serviceWorkers", "Data cached by service workers."),
	("extensionlocal", "Extension storage local to this machine."),
	("extensionsync", "Extension storage synced with the browser account."),
];

/// Kinds of browsing data, for `sanitise`. Each kind may be named once.
pub struct SanitiseSource;
impl SourceFetcher for SanitiseSource {
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>> {
		Box::pin(async move {
			let distinct =
				matches!(ctx.command.arguments, ArgumentShape::Repeated { distinct: true });
			let parsed = split_repeated(ctx.argument);
			let candidates = DATA_KINDS
				.into_iter()
				.filter(|(name, _)| !(distinct && parsed.completed.contains(name)))
				.map(|(name, description)| {
					Candidate::new(
						name,
						format!("{}{name}", parsed.prefix),
						vec![MatchKey::plain(name)],
						CandidatePayload::Keyword {
							name: name.to_string(),
							description: description.to_string(),
						},
					)
				})
				.collect();

			Ok(Fetched::filtered(candidates, parsed.current))
		})
	}
}
