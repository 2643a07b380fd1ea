use clap::Parser;

use gv_query::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	gv_query::run(args).await
}
