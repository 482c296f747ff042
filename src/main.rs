use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use courier::api::HttpClient;
use courier::core::config::{self, CliOverrides, CourierConfig};
use courier::core::session::SessionStore;
use courier::tui;

#[derive(Parser)]
#[command(name = "courier", about = "Terminal client for a simple messaging service")]
struct Args {
    /// Server root; endpoints become <URL>/auth, /users and /messages
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Where the signed-in user record is kept
    #[arg(long, value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Log level written to courier.log (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: String,

    /// Remove the stored session and exit
    #[arg(long)]
    logout: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the TUI owns stdout
    let level = args.log_level.parse().unwrap_or(LevelFilter::Debug);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("courier.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            CourierConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            session_file: args.session_file,
        },
    );
    log::info!(
        "Courier starting up: auth={}, users={}, messages={}",
        resolved.endpoints.auth,
        resolved.endpoints.users,
        resolved.endpoints.messages
    );

    let store = SessionStore::new(resolved.session_path.clone());
    if args.logout {
        store.clear().map_err(std::io::Error::other)?;
        println!("Signed out ({} removed)", store.path().display());
        return Ok(());
    }

    let api = Arc::new(HttpClient::new(resolved.endpoints.clone()));
    tui::run(resolved, api, store)
}
