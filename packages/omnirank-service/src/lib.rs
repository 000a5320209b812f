pub mod adapter;
pub mod coordinator;
pub mod filter;
pub mod registry;
pub mod source;
pub mod sources;

mod error;

pub use coordinator::{ChangeKind, Coordinator, Event, RefreshTask, SectionView};
pub use error::{Error, Result};
pub use filter::{FilterBridge, FuzzyMatch, MatchKey, SkimFuzzy};
pub use registry::{Candidate, CandidatePayload, CandidateRegistry};
pub use source::{
	Applied, CompletionSource, FetchContext, Fetched, PendingRefresh, RefreshOutcome,
	SourceFetcher, Trigger,
};

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;

use omnirank_domain::{
	RawItem,
	sessions::SessionRecord,
	tabs::{ContainerRecord, TabRecord, WindowRecord},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Browsing history as exposed by the host.
pub trait HistoryBackend
where
	Self: Send + Sync,
{
	/// Pages whose title or URL contains `text`. An empty `text` matches every page.
	fn search<'a>(
		&'a self,
		text: &'a str,
		max_results: Option<u32>,
		start_time: Option<OffsetDateTime>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RawItem>>>;

	fn visits<'a>(&'a self, url: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<OffsetDateTime>>>;

	fn top_sites(&self) -> BoxFuture<'_, color_eyre::Result<Vec<RawItem>>>;
}

pub trait BookmarkBackend
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, text: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<RawItem>>>;
}

pub trait TabBackend
where
	Self: Send + Sync,
{
	fn tabs(&self) -> BoxFuture<'_, color_eyre::Result<Vec<TabRecord>>>;

	fn windows(&self) -> BoxFuture<'_, color_eyre::Result<Vec<WindowRecord>>>;

	fn current_window_id(&self) -> BoxFuture<'_, color_eyre::Result<Option<u64>>>;
}

pub trait SessionBackend
where
	Self: Send + Sync,
{
	/// Recently closed tabs and windows, most recent first.
	fn recently_closed(&self) -> BoxFuture<'_, color_eyre::Result<Vec<SessionRecord>>>;
}

pub trait ContainerBackend
where
	Self: Send + Sync,
{
	fn containers(&self) -> BoxFuture<'_, color_eyre::Result<Vec<ContainerRecord>>>;
}

pub trait Clock
where
	Self: Send + Sync,
{
	fn now(&self) -> OffsetDateTime;
}

/// Every host capability the completion sources read from.
#[derive(Clone)]
pub struct Host {
	pub history: Arc<dyn HistoryBackend>,
	pub bookmarks: Arc<dyn BookmarkBackend>,
	pub tabs: Arc<dyn TabBackend>,
	pub sessions: Arc<dyn SessionBackend>,
	pub containers: Arc<dyn ContainerBackend>,
	pub clock: Arc<dyn Clock>,
}
impl Host {
	/// Uses `backend` for every capability.
	pub fn from_backend<B>(backend: Arc<B>, clock: Arc<dyn Clock>) -> Self
	where
		B: HistoryBackend
			+ BookmarkBackend
			+ TabBackend
			+ SessionBackend
			+ ContainerBackend
			+ 'static,
	{
		Self {
			history: backend.clone(),
			bookmarks: backend.clone(),
			tabs: backend.clone(),
			sessions: backend.clone(),
			containers: backend,
			clock,
		}
	}
}

pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}
