use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "incident-analyzer",
    version,
    about = "Root-cause analysis of safety incidents via a chat model"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/incident-analyzer.toml")]
    pub(crate) config: PathBuf,
    /// Overrides `listen_addr` from the config file.
    #[arg(long)]
    pub(crate) listen_addr: Option<String>,
    /// Overrides `database_path` from the config file.
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}
