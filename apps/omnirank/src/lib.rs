use std::{path::PathBuf, sync::Arc};

use clap::{
	Parser,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use omnirank_config::Config;
use omnirank_domain::{OptionState, SectionState};
use omnirank_service::{Candidate, CandidatePayload, Coordinator, SectionView};
use omnirank_testkit::FixtureHost;

#[derive(Debug, Parser)]
#[command(
	version = env!("CARGO_PKG_VERSION"),
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	/// Configuration file. Defaults apply when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	/// JSON description of the browser state to complete against.
	#[arg(long, short = 'f', value_name = "FILE")]
	pub fixture: PathBuf,
	/// Print each step as JSON instead of text.
	#[arg(long)]
	pub json: bool,
	/// Successive contents of the command line.
	#[arg(value_name = "INPUT", required = true)]
	pub inputs: Vec<String>,
}

/// The visible sections after one input settled.
#[derive(Debug, Serialize)]
pub struct Step {
	pub input: String,
	pub sections: Vec<SectionView>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = match &args.config {
		Some(path) => omnirank_config::load(path)?,
		None => Config::default(),
	};

	init_tracing(&config)?;

	let fixture = Arc::new(FixtureHost::load(&args.fixture)?);

	tracing::debug!(
		fixture = %args.fixture.display(),
		inputs = args.inputs.len(),
		"Replaying input."
	);

	let steps = replay(fixture, config, &args.inputs).await?;

	for step in &steps {
		if args.json {
			println!("{}", serde_json::to_string(step)?);
		} else {
			print!("{}", render(step));
		}
	}

	Ok(())
}

/// Feeds `inputs` one at a time, letting every refresh finish before the next.
pub async fn replay(
	fixture: Arc<FixtureHost>,
	cfg: Config,
	inputs: &[String],
) -> color_eyre::Result<Vec<Step>> {
	let clock = fixture.clock();
	let mut coordinator = Coordinator::new(fixture.into_host(clock), cfg)?;
	let mut steps = Vec::with_capacity(inputs.len());

	for input in inputs {
		coordinator.filter_and_wait(input).await;

		let sections = coordinator
			.sections()
			.into_iter()
			.filter(|section| section.state == SectionState::Normal)
			.collect();

		steps.push(Step { input: input.clone(), sections });
	}

	Ok(steps)
}

pub fn render(step: &Step) -> String {
	let mut out = format!("> {}\n", step.input);

	if step.sections.is_empty() {
		out.push_str("  (no completions)\n");
	}

	for section in &step.sections {
		out.push_str(&format!("[{}]\n", section.source.as_str()));

		for option in &section.options {
			let marker = if option.state == OptionState::Focused { '*' } else { ' ' };

			let line = format!("{marker} {}  {}", option.value, describe(option));

			out.push_str(line.trim_end());
			out.push('\n');
		}
	}

	out
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

fn describe(candidate: &Candidate) -> String {
	match &candidate.payload {
		CandidatePayload::Page(page) => format!("{} {}", page.title, page.url),
		CandidatePayload::Tab(entry) =>
			format!("{} {} {}", entry.status_display, entry.tab.title, entry.tab.url),
		CandidatePayload::Session(entry) =>
			format!("{} {} {}", entry.title, entry.url, entry.detail),
		CandidatePayload::Container(container) => format!("{} {}", container.color, container.icon),
		CandidatePayload::Keyword { description, .. } => description.clone(),
	}
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}
