use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use relaychat::app::{self, App};
use relaychat::args::Args;
use relaychat::backend::BackendClient;
use relaychat::broker::RedisConnector;
use relaychat::config::Config;
use relaychat::session;
use relaychat::store::Store;
use relaychat::sync::SyncWorkers;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.clone())?;
    args.apply_overrides(&mut config);

    let log_path = relaychat::logging::init(&config)?;
    info!(log = %log_path.display(), backend = %config.backend_host, "starting relaychat");

    // A panic inside the UI would otherwise leave the terminal in raw mode.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        app::restore_terminal();
        error!("panic: {info}");
        default_hook(info);
    }));

    let backend = BackendClient::new(&config.backend_host, config.backend_port)?;
    let session_path = config.session_path();
    let store = Store::new(Arc::new(backend), Arc::new(RedisConnector))
        .with_session_file(session_path.clone());

    if !args.no_resume {
        match session::load(&session_path) {
            Ok(Some(saved)) => {
                if let Err(e) = store.resume_session(&saved) {
                    warn!("could not resume saved session: {e:#}");
                }
            }
            Ok(None) => {}
            Err(e) => warn!("could not read saved session: {e:#}"),
        }
    }

    let workers = SyncWorkers::spawn(&store, config.sync_timing())?;

    // Create and run the TUI application
    let mut app = App::new(store, &config);
    let res = app.run();

    workers.stop();
    info!("relaychat stopped");
    res
}
