use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = chorus_api::Args::parse();
	chorus_api::run(args).await
}
