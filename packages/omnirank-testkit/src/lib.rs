//! In-memory host for exercising completion sources without a browser.

mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, HashSet},
	fs,
	path::Path,
	sync::{Arc, Mutex},
	time::Duration,
};

use color_eyre::eyre;
use serde::Deserialize;
use time::OffsetDateTime;

use omnirank_domain::{
	RawItem,
	sessions::SessionRecord,
	tabs::{ContainerRecord, TabRecord, WindowRecord},
};
use omnirank_service::{
	BookmarkBackend, BoxFuture, Clock, ContainerBackend, HistoryBackend, Host, SessionBackend,
	SystemClock, TabBackend,
};

/// Browser state served by [`FixtureHost`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
	#[serde(with = "omnirank_domain::time_serde::option")]
	pub now: Option<OffsetDateTime>,
	/// History pages. Their `visit_timestamps` are served by `visits`, not by `search`.
	pub history: Vec<RawItem>,
	pub top_sites: Vec<RawItem>,
	pub bookmarks: Vec<RawItem>,
	pub tabs: Vec<TabRecord>,
	pub windows: Vec<WindowRecord>,
	pub current_window_id: Option<u64>,
	pub sessions: Vec<SessionRecord>,
	pub containers: Vec<ContainerRecord>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Backend {
	History,
	Visits,
	TopSites,
	Bookmarks,
	Tabs,
	Windows,
	Sessions,
	Containers,
}
impl Backend {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::History => "history",
			Self::Visits => "visits",
			Self::TopSites => "top_sites",
			Self::Bookmarks => "bookmarks",
			Self::Tabs => "tabs",
			Self::Windows => "windows",
			Self::Sessions => "sessions",
			Self::Containers => "containers",
		}
	}
}

#[derive(Default)]
struct State {
	fixture: Fixture,
	delays: HashMap<(Backend, String), Duration>,
	failures: HashSet<Backend>,
	calls: HashMap<Backend, usize>,
}

pub struct FixtureHost {
	state: Mutex<State>,
}
impl FixtureHost {
	pub fn new(fixture: Fixture) -> Self {
		Self { state: Mutex::new(State { fixture, ..Default::default() }) }
	}

	pub fn from_json(raw: &str) -> Result<Self> {
		Ok(Self::new(serde_json::from_str(raw)?))
	}

	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|err| Error::ReadFixture { path: path.to_path_buf(), source: err })?;

		Self::from_json(&raw)
	}

	/// A host whose every capability is this fixture.
	pub fn into_host(self: Arc<Self>, clock: Arc<dyn Clock>) -> Host {
		Host::from_backend(self, clock)
	}

	/// The fixture's `now`, or the Unix epoch.
	pub fn now(&self) -> OffsetDateTime {
		self.with_state(|state| state.fixture.now).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}

	/// Stopped at the fixture's `now` if it has one, otherwise the system clock.
	pub fn clock(&self) -> Arc<dyn Clock> {
		match self.with_state(|state| state.fixture.now) {
			Some(now) => Arc::new(FixedClock(now)),
			None => Arc::new(SystemClock),
		}
	}

	/// Delays calls to `backend` whose query text is exactly `query`.
	///
	/// Backends without query text match the empty string.
	pub fn delay(&self, backend: Backend, query: &str, delay: Duration) {
		self.with_state(|state| state.delays.insert((backend, query.to_string()), delay));
	}

	pub fn fail(&self, backend: Backend) {
		self.with_state(|state| state.failures.insert(backend));
	}

	pub fn recover(&self, backend: Backend) {
		self.with_state(|state| state.failures.remove(&backend));
	}

	pub fn update(&self, f: impl FnOnce(&mut Fixture)) {
		self.with_state(|state| f(&mut state.fixture));
	}

	pub fn calls(&self, backend: Backend) -> usize {
		self.with_state(|state| state.calls.get(&backend).copied().unwrap_or(0))
	}

	fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		f(&mut state)
	}

	/// Applies injected latency and failure, then reads the fixture.
	async fn serve<T>(
		&self,
		backend: Backend,
		query: &str,
		read: impl FnOnce(&Fixture) -> T,
	) -> color_eyre::Result<T> {
		let delay = self.with_state(|state| {
			*state.calls.entry(backend).or_default() += 1;

			state.delays.get(&(backend, query.to_string())).copied()
		});

		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		self.with_state(|state| {
			if state.failures.contains(&backend) {
				return Err(eyre::eyre!("The {} backend is unavailable.", backend.as_str()));
			}

			Ok(read(&state.fixture))
		})
	}
}

impl HistoryBackend for FixtureHost {
	fn search<'a>(
		&'a self,
		text: &'a str,
		max_results: Option<u32>,
		start_time: Option<OffsetDateTime>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RawItem>>> {
		Box::pin(self.serve(Backend::History, text, move |fixture| {
			let mut out: Vec<RawItem> = fixture
				.history
				.iter()
				.filter(|item| matches_terms(item, text))
				.filter(|item| visited_since(item, start_time))
				.map(|item| RawItem { visit_timestamps: None, ..item.clone() })
				.collect();

			if let Some(max_results) = max_results {
				out.truncate(max_results as usize);
			}

			out
		}))
	}

	fn visits<'a>(
		&'a self,
		url: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<OffsetDateTime>>> {
		Box::pin(self.serve(Backend::Visits, url, move |fixture| {
			fixture
				.history
				.iter()
				.filter(|item| item.url == url)
				.flat_map(|item| item.visit_timestamps.iter().flatten().copied())
				.collect()
		}))
	}

	fn top_sites(&self) -> BoxFuture<'_, color_eyre::Result<Vec<RawItem>>> {
		Box::pin(self.serve(Backend::TopSites, "", |fixture| fixture.top_sites.clone()))
	}
}

impl BookmarkBackend for FixtureHost {
	fn search<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<RawItem>>> {
		Box::pin(self.serve(Backend::Bookmarks, text, move |fixture| {
			fixture.bookmarks.iter().filter(|item| matches_terms(item, text)).cloned().collect()
		}))
	}
}

impl TabBackend for FixtureHost {
	fn tabs(&self) -> BoxFuture<'_, color_eyre::Result<Vec<TabRecord>>> {
		Box::pin(self.serve(Backend::Tabs, "", |fixture| fixture.tabs.clone()))
	}

	fn windows(&self) -> BoxFuture<'_, color_eyre::Result<Vec<WindowRecord>>> {
		Box::pin(self.serve(Backend::Windows, "", |fixture| fixture.windows.clone()))
	}

	fn current_window_id(&self) -> BoxFuture<'_, color_eyre::Result<Option<u64>>> {
		Box::pin(self.serve(Backend::Windows, "", |fixture| fixture.current_window_id))
	}
}

impl SessionBackend for FixtureHost {
	fn recently_closed(&self) -> BoxFuture<'_, color_eyre::Result<Vec<SessionRecord>>> {
		Box::pin(self.serve(Backend::Sessions, "", |fixture| fixture.sessions.clone()))
	}
}

impl ContainerBackend for FixtureHost {
	fn containers(&self) -> BoxFuture<'_, color_eyre::Result<Vec<ContainerRecord>>> {
		Box::pin(self.serve(Backend::Containers, "", |fixture| fixture.containers.clone()))
	}
}

/// A clock stopped at one instant.
pub struct FixedClock(pub OffsetDateTime);
impl Clock for FixedClock {
	fn now(&self) -> OffsetDateTime {
		self.0
	}
}

/// Every whitespace separated term of `text` occurs in the title or URL, ignoring case.
fn matches_terms(item: &RawItem, text: &str) -> bool {
	let title = item.title.to_lowercase();
	let url = item.url.to_lowercase();

	text.split_whitespace()
		.map(str::to_lowercase)
		.all(|term| title.contains(&term) || url.contains(&term))
}

fn visited_since(item: &RawItem, start_time: Option<OffsetDateTime>) -> bool {
	match (start_time, &item.visit_timestamps) {
		(Some(start), Some(visits)) if !visits.is_empty() => {
			visits.iter().any(|visit| *visit >= start)
		},
		_ => true,
	}
}
