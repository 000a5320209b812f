use std::{sync::Arc, time::Duration};

use time::{OffsetDateTime, macros::datetime};

use omnirank_config::Config;
use omnirank_domain::RawItem;
use omnirank_service::adapter;
use omnirank_testkit::{Backend, FixedClock, Fixture, FixtureHost};

const NOW: OffsetDateTime = datetime!(2026-05-04 09:30 UTC);

#[tokio::test(start_paused = true)]
async fn visit_lookups_run_concurrently_and_keep_rank_order() {
	let history = (0..10)
		.map(|i| RawItem {
			visit_timestamps: Some(vec![NOW - time::Duration::hours(i)]),
			..RawItem::new(format!("Page {i}"), format!("https://page{i}.test"))
		})
		.collect::<Vec<_>>();
	let fixture = FixtureHost::new(Fixture { history: history.clone(), ..Default::default() });

	for item in &history {
		fixture.delay(Backend::Visits, &item.url, Duration::from_millis(100));
	}

	let fixture = Arc::new(fixture);
	let host = fixture.clone().into_host(Arc::new(FixedClock(NOW)));
	let mut cfg = Config::default();

	cfg.history.half_life_days = 7.0;

	let started = tokio::time::Instant::now();
	let ranked = adapter::history(&host, &cfg, "page", NOW).await.expect("History must load.");
	let elapsed = started.elapsed();

	assert!(elapsed < Duration::from_millis(300), "lookups took {elapsed:?}");
	assert_eq!(fixture.calls(Backend::Visits), 10);
	assert_eq!(
		ranked.iter().map(|page| page.url.as_str()).collect::<Vec<_>>(),
		history.iter().map(|item| item.url.as_str()).collect::<Vec<_>>()
	);
}

#[tokio::test]
async fn failed_visit_lookup_fails_the_history_refresh() {
	let fixture = Arc::new(FixtureHost::new(Fixture {
		history: vec![RawItem::new("Page", "https://page.test")],
		..Default::default()
	}));
	let host = fixture.clone().into_host(Arc::new(FixedClock(NOW)));
	let mut cfg = Config::default();

	cfg.history.half_life_days = 7.0;
	fixture.fail(Backend::Visits);

	assert!(adapter::history(&host, &cfg, "page", NOW).await.is_err());
}
