//! One completion section: its commands, its registry and its visibility.
//!
//! Refreshes are split in two halves so the caller decides how they run.
//! [`CompletionSource::on_input`] and [`CompletionSource::on_external_change`] describe a refresh
//! without awaiting anything, and [`CompletionSource::apply`] folds a finished refresh back in.
//! A result is applied only if the input it was issued for is still the source's current input.

use std::sync::Arc;

use time::OffsetDateTime;

use omnirank_config::{Config, DuplicatePolicy, SourceSettings};
use omnirank_domain::{
	SectionState,
	command::{CommandSchema, CommandTable, SourceKind, split_command},
};

use crate::{BoxFuture, Candidate, CandidateRegistry, FilterBridge, Host, Result};

/// Everything a fetcher may read while producing candidates.
#[derive(Clone, Copy)]
pub struct FetchContext<'a> {
	pub host: &'a Host,
	pub cfg: &'a Config,
	pub command: &'a CommandSchema,
	/// Input after the command name, leading whitespace removed.
	pub argument: &'a str,
	pub now: OffsetDateTime,
}

pub struct Fetched {
	pub candidates: Vec<Candidate>,
	/// Text to fuzzy filter by. `None` if the backend already matched the query.
	pub filter_query: Option<String>,
}
impl Fetched {
	pub fn filtered(candidates: Vec<Candidate>, query: impl Into<String>) -> Self {
		Self { candidates, filter_query: Some(query.into()) }
	}

	pub fn prefiltered(candidates: Vec<Candidate>) -> Self {
		Self { candidates, filter_query: None }
	}
}

pub trait SourceFetcher
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, ctx: FetchContext<'a>) -> BoxFuture<'a, Result<Fetched>>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trigger {
	Input,
	External,
}

/// A refresh the source wants run, tagged with the input it belongs to.
#[derive(Clone, Debug)]
pub struct PendingRefresh {
	pub kind: SourceKind,
	pub query: String,
	pub command: CommandSchema,
	pub argument: String,
	pub trigger: Trigger,
}

pub struct RefreshOutcome {
	pub kind: SourceKind,
	pub query: String,
	pub trigger: Trigger,
	pub result: Result<Fetched>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
	/// The input changed since the refresh was issued; nothing was touched.
	Stale,
	Updated,
	/// The fetch failed or its candidates were rejected; the section is now empty and hidden.
	Failed,
}

pub struct CompletionSource {
	kind: SourceKind,
	commands: Vec<CommandSchema>,
	fetcher: Arc<dyn SourceFetcher>,
	settings: SourceSettings,
	registry: CandidateRegistry,
	state: SectionState,
	last_query: String,
}
impl CompletionSource {
	pub fn new(
		kind: SourceKind,
		table: &CommandTable,
		fetcher: Arc<dyn SourceFetcher>,
		settings: SourceSettings,
		on_duplicate: DuplicatePolicy,
	) -> Self {
		Self {
			kind,
			commands: table.for_source(kind).cloned().collect(),
			fetcher,
			settings,
			registry: CandidateRegistry::new(kind.as_str(), on_duplicate),
			state: SectionState::Hidden,
			last_query: String::new(),
		}
	}

	pub fn kind(&self) -> SourceKind {
		self.kind
	}

	pub fn state(&self) -> SectionState {
		self.state
	}

	pub fn last_query(&self) -> &str {
		&self.last_query
	}

	pub fn registry(&self) -> &CandidateRegistry {
		&self.registry
	}

	pub fn fetcher(&self) -> Arc<dyn SourceFetcher> {
		self.fetcher.clone()
	}

	pub fn options(&self) -> Vec<&Candidate> {
		match self.state {
			SectionState::Normal => self.registry.options(),
			SectionState::Hidden => Vec::new(),
		}
	}

	/// Moves focus to the visible candidate with `key`.
	pub fn focus(&mut self, key: &str) -> bool {
		self.registry.focus(key)
	}

	/// Records `input` as current and updates section visibility for it.
	///
	/// Returns the refresh to run if this source handles the input's command.
	pub fn on_input(&mut self, input: &str) -> Option<PendingRefresh> {
		input.clone_into(&mut self.last_query);

		let Some((command, argument)) = self.matching_command(input) else {
			self.set_state(SectionState::Hidden, "command no longer matches");

			return None;
		};

		self.set_state(SectionState::Normal, "command matches");

		Some(self.pending(command, argument, Trigger::Input))
	}

	/// Refreshes at the current input after the backing data changed.
	///
	/// Returns `None` if the current input is not one of this source's commands.
	pub fn on_external_change(&self) -> Option<PendingRefresh> {
		let (command, argument) = self.matching_command(&self.last_query)?;

		Some(self.pending(command, argument, Trigger::External))
	}

	pub fn apply(&mut self, outcome: RefreshOutcome, bridge: &FilterBridge) -> Applied {
		let source = self.kind.as_str();

		if outcome.query != self.last_query {
			tracing::debug!(
				source,
				issued_for = %outcome.query,
				current = %self.last_query,
				"Discarding stale refresh."
			);

			return Applied::Stale;
		}

		let fetched = match outcome.result {
			Ok(fetched) => fetched,
			Err(err) => {
				tracing::warn!(source, error = %err, "Source refresh failed.");

				return self.fail();
			},
		};
		let previous_focus = match outcome.trigger {
			Trigger::External => self.registry.focused(),
			Trigger::Input => None,
		};

		if let Err(err) = self.registry.replace_all(fetched.candidates) {
			tracing::error!(source, error = %err, "Rejected candidate list.");

			return self.fail();
		}

		match fetched.filter_query.as_deref() {
			Some(query) => self.registry.apply_query(query, bridge, self.settings.autoselect),
			None => self.registry.show_all(),
		}

		if let Some((key, position)) = previous_focus
			&& !self.registry.focus(&key)
		{
			self.registry.focus_at(position);
		}
		if self.registry.is_empty() && self.settings.hide_on_empty {
			self.set_state(SectionState::Hidden, "refresh returned nothing");
		}

		Applied::Updated
	}

	fn fail(&mut self) -> Applied {
		self.registry.clear();
		self.set_state(SectionState::Hidden, "refresh failed");

		Applied::Failed
	}

	fn set_state(&mut self, state: SectionState, reason: &str) {
		if self.state != state {
			tracing::debug!(source = self.kind.as_str(), ?state, reason, "Section transition.");

			self.state = state;
		}
	}

	fn matching_command(&self, input: &str) -> Option<(CommandSchema, String)> {
		let parsed = split_command(input);

		self.commands
			.iter()
			.find(|command| command.name == parsed.command)
			.map(|command| (command.clone(), parsed.argument.to_string()))
	}

	fn pending(
		&self,
		command: CommandSchema,
		argument: String,
		trigger: Trigger,
	) -> PendingRefresh {
		let query = self.last_query.clone();

		PendingRefresh { kind: self.kind, query, command, argument, trigger }
	}
}
