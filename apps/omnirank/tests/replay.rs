use std::{path::Path, sync::Arc};

use omnirank::{render, replay};
use omnirank_config::Config;
use omnirank_domain::command::SourceKind;
use omnirank_testkit::FixtureHost;

fn demo() -> Arc<FixtureHost> {
	let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.json");

	Arc::new(FixtureHost::load(&path).expect("Demo fixture must load."))
}

fn inputs(raw: &[&str]) -> Vec<String> {
	raw.iter().map(|input| input.to_string()).collect()
}

#[tokio::test]
async fn replay_reports_only_visible_sections() {
	let steps = replay(demo(), Config::default(), &inputs(&["undo", "recontain sh", "xyz"]))
		.await
		.expect("Replay must succeed.");

	assert_eq!(steps.len(), 3);
	assert_eq!(
		steps[0].sections.iter().map(|section| section.source).collect::<Vec<_>>(),
		vec![SourceKind::Sessions]
	);
	assert_eq!(
		steps[0].sections[0]
			.options
			.iter()
			.map(|option| option.value.as_str())
			.collect::<Vec<_>>(),
		vec!["closed-1", "closed-2"]
	);
	assert_eq!(render(&steps[1]), "> recontain sh\n[containers]\n* Shopping  pink cart\n");
	assert_eq!(render(&steps[2]), "> xyz\n  (no completions)\n");
}

#[tokio::test]
async fn demo_config_loads_and_drives_history() {
	let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.toml");
	let cfg = omnirank_config::load(&path).expect("Demo config must load.");
	let steps = replay(demo(), cfg, &inputs(&["open"])).await.expect("Replay must succeed.");
	let history = &steps[0].sections[0];

	assert_eq!(history.source, SourceKind::History);
	assert_eq!(history.options[0].value, "ddg");
	assert!(history.options.iter().all(|option| option.value != "about:newtab"));
}
