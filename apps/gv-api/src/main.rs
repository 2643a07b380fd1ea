use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = gv_api::Args::parse();

	gv_api::run(args).await
}
