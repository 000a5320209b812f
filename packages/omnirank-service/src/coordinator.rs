//! Routes input and change notifications to the completion sources.
//!
//! All registry mutation happens on the coordinator's own task, between awaits. Fetches run
//! concurrently and come back as [`RefreshOutcome`]s, which each source either applies or
//! discards as stale.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::{
	sync::{mpsc, watch},
	task::{self, JoinSet},
};

use omnirank_config::Config;
use omnirank_domain::{
	SectionState,
	command::{CommandTable, SourceKind},
};

use crate::{
	Candidate, CompletionSource, Error, FetchContext, FilterBridge, Host, Result, SourceFetcher,
	source::{Applied, PendingRefresh, RefreshOutcome, Trigger},
	sources,
};

/// Which backing data changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
	Tabs,
	Sessions,
	Containers,
	History,
	Bookmarks,
}
impl ChangeKind {
	pub fn affects(self, kind: SourceKind) -> bool {
		matches!(
			(self, kind),
			(Self::Tabs, SourceKind::TabAll)
				| (Self::Sessions, SourceKind::Sessions)
				| (Self::Containers, SourceKind::Containers | SourceKind::TabAll)
				| (Self::History, SourceKind::History)
				| (Self::Bookmarks, SourceKind::History | SourceKind::Bookmarks)
		)
	}
}

#[derive(Clone, Debug)]
pub enum Event {
	Input(String),
	External(ChangeKind),
	Shutdown,
}

/// What the rendering layer sees of one section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionView {
	pub source: SourceKind,
	pub state: SectionState,
	pub query: String,
	pub options: Vec<Candidate>,
}

/// A refresh ready to run on any task. It owns everything its fetch reads.
pub struct RefreshTask {
	pending: PendingRefresh,
	fetcher: Arc<dyn SourceFetcher>,
	host: Arc<Host>,
	cfg: Arc<Config>,
}
impl RefreshTask {
	pub fn kind(&self) -> SourceKind {
		self.pending.kind
	}

	pub fn query(&self) -> &str {
		&self.pending.query
	}

	pub async fn run(self) -> RefreshOutcome {
		let ctx = FetchContext {
			host: &self.host,
			cfg: &self.cfg,
			command: &self.pending.command,
			argument: &self.pending.argument,
			now: self.host.clock.now(),
		};
		let result = self.fetcher.fetch(ctx).await;

		RefreshOutcome {
			kind: self.pending.kind,
			query: self.pending.query,
			trigger: self.pending.trigger,
			result,
		}
	}
}

pub struct Coordinator {
	host: Arc<Host>,
	cfg: Arc<Config>,
	bridge: FilterBridge,
	sources: Vec<CompletionSource>,
}
impl Coordinator {
	/// Builds the standard sections over the standard command table.
	pub fn new(host: Host, cfg: Config) -> Result<Self> {
		let table = CommandTable::standard()?;
		let bridge = FilterBridge::skim(cfg.fuzzy.min_score);
		let sources = sources::standard(&cfg, &table);

		Ok(Self::with_sources(host, cfg, bridge, sources))
	}

	pub fn with_sources(
		host: Host,
		cfg: Config,
		bridge: FilterBridge,
		sources: Vec<CompletionSource>,
	) -> Self {
		Self { host: Arc::new(host), cfg: Arc::new(cfg), bridge, sources }
	}

	pub fn sources(&self) -> &[CompletionSource] {
		&self.sources
	}

	pub fn source(&self, kind: SourceKind) -> Option<&CompletionSource> {
		self.sources.iter().find(|source| source.kind() == kind)
	}

	/// Updates every source for new input and returns the refreshes to run.
	pub fn filter(&mut self, input: &str) -> Vec<RefreshTask> {
		let pending: Vec<(PendingRefresh, Arc<dyn SourceFetcher>)> = self
			.sources
			.iter_mut()
			.filter_map(|source| source.on_input(input).map(|pending| (pending, source.fetcher())))
			.collect();

		pending.into_iter().map(|(pending, fetcher)| self.task(pending, fetcher)).collect()
	}

	/// Refreshes every affected source at its current input.
	pub fn on_external_change(&self, change: ChangeKind) -> Vec<RefreshTask> {
		let pending: Vec<(PendingRefresh, Arc<dyn SourceFetcher>)> = self
			.sources
			.iter()
			.filter(|source| change.affects(source.kind()))
			.filter_map(|source| {
				source.on_external_change().map(|pending| (pending, source.fetcher()))
			})
			.collect();

		tracing::debug!(?change, refreshes = pending.len(), "External change.");

		pending.into_iter().map(|(pending, fetcher)| self.task(pending, fetcher)).collect()
	}

	pub fn focus(&mut self, kind: SourceKind, key: &str) -> bool {
		self.sources
			.iter_mut()
			.find(|source| source.kind() == kind)
			.is_some_and(|source| source.focus(key))
	}

	pub fn apply(&mut self, outcome: RefreshOutcome) -> Applied {
		let Some(source) = self.sources.iter_mut().find(|source| source.kind() == outcome.kind)
		else {
			return Applied::Stale;
		};

		source.apply(outcome, &self.bridge)
	}

	/// Runs [`Self::filter`] and applies each refresh as it finishes.
	pub async fn filter_and_wait(&mut self, input: &str) {
		let tasks = self.filter(input);

		self.run_to_completion(tasks).await;
	}

	pub async fn external_change_and_wait(&mut self, change: ChangeKind) {
		let tasks = self.on_external_change(change);

		self.run_to_completion(tasks).await;
	}

	pub fn sections(&self) -> Vec<SectionView> {
		self.sources
			.iter()
			.map(|source| SectionView {
				source: source.kind(),
				state: source.state(),
				query: source.last_query().to_string(),
				options: source.options().into_iter().cloned().collect(),
			})
			.collect()
	}

	/// Serves events until [`Event::Shutdown`] or until every sender is dropped.
	///
	/// A fresh snapshot is published after every event and every applied refresh.
	pub async fn run(
		mut self,
		mut events: mpsc::Receiver<Event>,
		views: watch::Sender<Vec<SectionView>>,
	) {
		let mut inflight = Inflight::default();

		loop {
			tokio::select! {
				event = events.recv() => {
					let tasks = match event {
						Some(Event::Input(input)) => self.filter(&input),
						Some(Event::External(change)) => self.on_external_change(change),
						Some(Event::Shutdown) | None => break,
					};

					for task in tasks {
						inflight.spawn(task);
					}

					views.send_replace(self.sections());
				},
				Some(outcome) = inflight.next(), if !inflight.is_empty() => {
					if self.apply(outcome) != Applied::Stale {
						views.send_replace(self.sections());
					}
				},
			}
		}

		inflight.tasks.shutdown().await;
	}

	async fn run_to_completion(&mut self, tasks: Vec<RefreshTask>) {
		let mut inflight = Inflight::default();

		for task in tasks {
			inflight.spawn(task);
		}

		while let Some(outcome) = inflight.next().await {
			self.apply(outcome);
		}
	}

	fn task(&self, pending: PendingRefresh, fetcher: Arc<dyn SourceFetcher>) -> RefreshTask {
		RefreshTask { pending, fetcher, host: self.host.clone(), cfg: self.cfg.clone() }
	}
}

/// Spawned refreshes, remembered by task id so a fetch that panicked still fails its source.
#[derive(Default)]
struct Inflight {
	tasks: JoinSet<RefreshOutcome>,
	issued: HashMap<task::Id, (SourceKind, String, Trigger)>,
}
impl Inflight {
	fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	fn spawn(&mut self, task: RefreshTask) {
		let issued = (task.pending.kind, task.pending.query.clone(), task.pending.trigger);
		let handle = self.tasks.spawn(task.run());

		self.issued.insert(handle.id(), issued);
	}

	/// The next finished refresh. A task that died becomes a failed outcome for its input.
	async fn next(&mut self) -> Option<RefreshOutcome> {
		loop {
			let err = match self.tasks.join_next_with_id().await? {
				Ok((id, outcome)) => {
					self.issued.remove(&id);

					return Some(outcome);
				},
				Err(err) => err,
			};
			let Some((kind, query, trigger)) = self.issued.remove(&err.id()) else {
				tracing::error!(error = %err, "Untracked refresh task aborted.");

				continue;
			};

			tracing::error!(source = kind.as_str(), %query, error = %err, "Refresh task aborted.");

			let result = Err(Error::Adapter {
				backend: kind.as_str().to_string(),
				message: err.to_string(),
			});

			return Some(RefreshOutcome { kind, query, trigger, result });
		}
	}
}
