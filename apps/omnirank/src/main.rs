use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = omnirank::Args::parse();
	omnirank::run(args).await
}
