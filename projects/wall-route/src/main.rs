mod cli;
mod commands;
mod overlay;
mod route;
mod session;
mod web;

use anyhow::Result;
use cli::{Args, Command};
use overlay::svg::OverlayStyle;
use web::server::run_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so rendered output can be piped from stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse_args();
    let style = OverlayStyle::from(&args.style);

    match &args.command {
        Command::Serve { host, port } => run_server(*host, *port, style).await?,
        Command::Render(render) => commands::render(render, &style)?,
        Command::Select(select) => commands::select(select)?,
    }

    Ok(())
}
