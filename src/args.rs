use crate::config::Config;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

// Command-line flags. Anything given here wins over config.toml.
//   -c / --config      Path to a config.toml file
//   --backend-host     Backend HTTP host
//   --backend-port     Backend HTTP port
//   --log-file         Where tracing output goes
//   --no-resume        Ignore a saved session and start at sign-up
#[derive(Debug, Clone, Parser)]
#[command(name = "relaychat", version, about)]
pub struct Args {
    /// Path to a config.toml file
    #[arg(short = 'c', long, value_name = "PATH", env = "RELAYCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend HTTP host
    #[arg(long, value_name = "HOST", env = "RELAYCHAT_BACKEND_HOST")]
    pub backend_host: Option<String>,

    /// Backend HTTP port
    #[arg(long, value_name = "PORT", env = "RELAYCHAT_BACKEND_PORT")]
    pub backend_port: Option<u16>,

    /// Log file (default: <settings_dir>/relaychat.log)
    #[arg(long, value_name = "PATH", env = "RELAYCHAT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Do not resume a saved session
    #[arg(long = "no-resume", action = ArgAction::SetTrue)]
    pub no_resume: bool,
}

impl Args {
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.backend_host {
            config.backend_host = host.clone();
        }

        if let Some(port) = self.backend_port {
            config.backend_port = port;
        }

        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
    }
}
