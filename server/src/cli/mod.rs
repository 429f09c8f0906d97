use clap::Parser;
use std::path::PathBuf;

/// Server CLI for groupchat-server
#[derive(Parser, Debug, Clone)]
#[command(
    name = "groupchat-server",
    version,
    about = "Group chat and file sharing server"
)]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "groupchat.toml")]
    pub config: PathBuf,

    /// TCP port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
