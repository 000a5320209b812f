//! Pure snapshot of all open tabs.
//!
//! Everything the all-tabs source shows is derived here from records fetched up front, so the
//! current and alternate tab are decided against one consistent view of the browser.

use serde::{Deserialize, Serialize};

use omnirank_config::{Status, StatusIcons};

/// Cookie store id of the default (non-container) identity.
pub const DEFAULT_COOKIE_STORE: &str = "firefox-default";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TabRecord {
	pub id: u64,
	pub window_id: u64,
	pub index: u32,
	pub title: String,
	pub url: String,
	pub active: bool,
	pub pinned: bool,
	pub audible: bool,
	pub muted: bool,
	pub discarded: bool,
	/// Milliseconds since the epoch.
	pub last_accessed: i64,
	pub cookie_store_id: Option<String>,
	pub fav_icon_url: Option<String>,
	pub group: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct WindowRecord {
	pub id: u64,
	pub incognito: bool,
	pub focused: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ContainerRecord {
	pub cookie_store_id: String,
	pub name: String,
	pub color: String,
	pub icon: String,
}
impl ContainerRecord {
	pub fn default_identity() -> Self {
		Self {
			cookie_store_id: DEFAULT_COOKIE_STORE.to_string(),
			name: "default".to_string(),
			color: "invisible".to_string(),
			icon: "noicon".to_string(),
		}
	}

	pub fn is_default(&self) -> bool {
		self.name == "default"
	}
}

/// Everything fetched from the host for one tab refresh.
#[derive(Clone, Debug, Default)]
pub struct TabSnapshotInput {
	pub tabs: Vec<TabRecord>,
	pub windows: Vec<WindowRecord>,
	pub containers: Vec<ContainerRecord>,
	pub current_window_id: Option<u64>,
	pub exclude_current_window: bool,
}

/// One tab as offered for completion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TabEntry {
	pub tab: TabRecord,
	/// `"<window ordinal>.<tab position>"`, or `"#"` for the alternate tab.
	pub value: String,
	/// 1-based ordinal of the tab's window among all windows, ordered by window id.
	pub window_index: u32,
	pub is_current: bool,
	pub is_alternate: bool,
	pub incognito: bool,
	pub container: ContainerRecord,
	/// Plain status letters (`%`, `#`, `P`, `A`, `M`, `D`).
	pub status: String,
	/// Status as rendered; icons when pretty status is enabled, otherwise the plain letters.
	pub status_display: String,
	pub match_keys: Vec<String>,
}

pub fn build_tab_snapshot(input: TabSnapshotInput, status: &Status) -> Vec<TabEntry> {
	let TabSnapshotInput {
		mut tabs,
		windows,
		containers,
		current_window_id,
		exclude_current_window,
	} = input;

	tabs.sort_by(|left, right| {
		left.window_id.cmp(&right.window_id).then_with(|| left.index.cmp(&right.index))
	});

	let current = current_window_id.and_then(|window_id| {
		tabs.iter().find(|tab| tab.window_id == window_id && tab.active).map(|tab| tab.id)
	});
	let alternate = current_window_id.and_then(|window_id| alternate_tab_id(&tabs, window_id));
	let mut out = Vec::with_capacity(tabs.len());
	let mut last_window = None;
	let mut window_index = 0_u32;

	for tab in tabs {
		if last_window != Some(tab.window_id) {
			last_window = Some(tab.window_id);
			window_index += 1;
		}
		if exclude_current_window && Some(tab.window_id) == current_window_id {
			continue;
		}

		let incognito =
			windows.iter().find(|window| window.id == tab.window_id).is_some_and(|w| w.incognito);
		let container = container_for(&containers, tab.cookie_store_id.as_deref());
		let is_current = Some(tab.id) == current;
		let is_alternate = !is_current && Some(tab.id) == alternate;

		out.push(build_entry(
			tab,
			window_index,
			is_current,
			is_alternate,
			incognito,
			container,
			status,
		));
	}

	out
}

/// The second most recently accessed tab of `window_id`.
pub fn alternate_tab_id(tabs: &[TabRecord], window_id: u64) -> Option<u64> {
	let mut in_window: Vec<&TabRecord> =
		tabs.iter().filter(|tab| tab.window_id == window_id).collect();

	in_window.sort_by(|left, right| right.last_accessed.cmp(&left.last_accessed));

	in_window.get(1).map(|tab| tab.id)
}

fn container_for(
	containers: &[ContainerRecord],
	cookie_store_id: Option<&str>,
) -> ContainerRecord {
	cookie_store_id
		.and_then(|id| containers.iter().find(|container| container.cookie_store_id == id))
		.cloned()
		.unwrap_or_else(ContainerRecord::default_identity)
}

fn build_entry(
	tab: TabRecord,
	window_index: u32,
	is_current: bool,
	is_alternate: bool,
	incognito: bool,
	container: ContainerRecord,
	status: &Status,
) -> TabEntry {
	let position = format!("{window_index}.{}", tab.index + 1);
	let value = if is_alternate { "#".to_string() } else { position };
	let plain = plain_status(&tab, is_current, is_alternate);
	let mut match_keys = Vec::new();
	let status_display = if status.pretty {
		let pretty = pretty_status(&tab, is_alternate, &status.icons);

		match_keys.push(pretty.clone());

		pretty
	} else {
		plain.clone()
	};

	match_keys.push(plain.clone());
	match_keys.push(tab.group.clone().unwrap_or_default());
	match_keys.push(value.clone());
	match_keys.push(tab.title.clone());
	match_keys.push(tab.url.clone());

	if !container.is_default() {
		match_keys.push(container.name.clone());
	}

	TabEntry {
		tab,
		value,
		window_index,
		is_current,
		is_alternate,
		incognito,
		container,
		status: plain,
		status_display,
		match_keys,
	}
}

fn plain_status(tab: &TabRecord, is_current: bool, is_alternate: bool) -> String {
	let mut out = String::new();

	if is_current {
		out.push('%');
	} else if is_alternate {
		out.push('#');
	}
	if tab.pinned {
		out.push('P');
	}
	if tab.audible {
		out.push('A');
	}
	if tab.muted {
		out.push('M');
	}
	if tab.discarded {
		out.push('D');
	}

	out
}

fn pretty_status(tab: &TabRecord, is_alternate: bool, icons: &StatusIcons) -> String {
	[
		(tab.active, &icons.active),
		(is_alternate, &icons.alternate),
		(tab.pinned, &icons.pinned),
		(tab.audible, &icons.audible),
		(tab.muted, &icons.muted),
		(tab.discarded, &icons.discarded),
	]
	.into_iter()
	.filter(|(set, _)| *set)
	.map(|(_, icon)| icon.as_str())
	.collect()
}
