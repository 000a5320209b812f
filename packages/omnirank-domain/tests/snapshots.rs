use time::{Duration, macros::datetime};

use omnirank_config::Status;
use omnirank_domain::{
	sessions::{AgeUnit, SessionRecord, build_session_entry},
	tabs::{ContainerRecord, TabRecord, TabSnapshotInput, WindowRecord, build_tab_snapshot},
};

fn tab(id: u64, window_id: u64, index: u32, last_accessed: i64) -> TabRecord {
	TabRecord {
		id,
		window_id,
		index,
		title: format!("Tab {id}"),
		url: format!("https://tab{id}.test"),
		last_accessed,
		..Default::default()
	}
}

fn input(exclude_current_window: bool) -> TabSnapshotInput {
	let mut current = tab(2, 10, 1, 300);

	current.active = true;
	current.pinned = true;

	let mut audible = tab(4, 20, 0, 50);

	audible.audible = true;
	audible.cookie_store_id = Some("container-1".to_string());

	TabSnapshotInput {
		tabs: vec![audible, tab(3, 10, 2, 200), current, tab(1, 10, 0, 100)],
		windows: vec![
			WindowRecord { id: 10, incognito: false, focused: true },
			WindowRecord { id: 20, incognito: true, focused: false },
		],
		containers: vec![ContainerRecord {
			cookie_store_id: "container-1".to_string(),
			name: "Work".to_string(),
			color: "blue".to_string(),
			icon: "briefcase".to_string(),
		}],
		current_window_id: Some(10),
		exclude_current_window,
	}
}

#[test]
fn tabs_are_numbered_by_window_then_index() {
	let entries = build_tab_snapshot(input(false), &Status::default());
	let values: Vec<&str> = entries.iter().map(|entry| entry.value.as_str()).collect();

	assert_eq!(values, vec!["1.1", "1.2", "#", "2.1"]);
}

#[test]
fn current_and_alternate_tabs_are_marked() {
	let entries = build_tab_snapshot(input(false), &Status::default());
	let current = entries.iter().find(|entry| entry.tab.id == 2).expect("Current tab exists.");
	let alternate = entries.iter().find(|entry| entry.tab.id == 3).expect("Alternate tab exists.");

	assert!(current.is_current);
	assert_eq!(current.status, "%P");
	assert!(alternate.is_alternate);
	assert_eq!(alternate.status, "#");
}

#[test]
fn container_and_incognito_are_carried() {
	let entries = build_tab_snapshot(input(false), &Status::default());
	let other = entries.iter().find(|entry| entry.tab.id == 4).expect("Tab 4 exists.");
	let plain = entries.iter().find(|entry| entry.tab.id == 1).expect("Tab 1 exists.");

	assert!(other.incognito);
	assert_eq!(other.status, "A");
	assert!(other.match_keys.contains(&"Work".to_string()));
	assert!(!plain.match_keys.contains(&"default".to_string()));
}

#[test]
fn grabbing_excludes_current_window_but_keeps_ordinals() {
	let entries = build_tab_snapshot(input(true), &Status::default());

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].value, "2.1");
}

#[test]
fn pretty_status_keeps_plain_letters_as_match_keys() {
	let status = Status { pretty: true, ..Default::default() };
	let entries = build_tab_snapshot(input(false), &status);
	let current = entries.iter().find(|entry| entry.tab.id == 2).expect("Current tab exists.");

	assert_eq!(
		current.status_display,
		format!("{}{}", status.icons.active, status.icons.pinned)
	);
	assert!(current.match_keys.contains(&"%P".to_string()));
}

#[test]
fn window_sessions_use_their_latest_tab() {
	let now = datetime!(2026-02-02 10:00 UTC);
	let record = SessionRecord::Window {
		session_id: "w1".to_string(),
		last_modified: now - Duration::minutes(3),
		tabs: vec![tab(1, 1, 0, 10), tab(2, 1, 1, 90), tab(3, 1, 2, 40)],
	};
	let entry =
		build_session_entry(&record, now, &Status::default()).expect("Window has a primary tab.");

	assert_eq!(entry.session_id, "w1");
	assert_eq!(entry.title, "Tab 2");
	assert_eq!(entry.status, "W");
	assert_eq!(entry.detail, "2 more tabs");
	assert_eq!(entry.age, (3, AgeUnit::Minutes));
}

#[test]
fn tab_sessions_show_their_url() {
	let now = datetime!(2026-02-02 10:00 UTC);
	let record = SessionRecord::Tab {
		session_id: "t1".to_string(),
		last_modified: now - Duration::days(2),
		tab: tab(7, 1, 0, 0),
	};
	let entry = build_session_entry(&record, now, &Status::default()).expect("Tab session.");

	assert_eq!(entry.status, "T");
	assert_eq!(entry.detail, "https://tab7.test");
	assert_eq!(entry.age, (2, AgeUnit::Days));
}

#[test]
fn empty_window_sessions_are_skipped() {
	let now = datetime!(2026-02-02 10:00 UTC);
	let record =
		SessionRecord::Window { session_id: "w".to_string(), last_modified: now, tabs: Vec::new() };

	assert!(build_session_entry(&record, now, &Status::default()).is_none());
}
