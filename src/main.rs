use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use ragchat::core::config;
use ragchat::tui;

#[derive(Parser)]
#[command(name = "ragchat", about = "Terminal client for a document Q&A backend")]
struct Args {
    /// Base URL of the backend API (overrides config file and RAGCHAT_API_URL)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ragchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("ragchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ragchat: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&file_config, args.api_url.as_deref());

    log::info!("ragchat starting against {}", resolved.base_url);

    tui::run(resolved)
}
