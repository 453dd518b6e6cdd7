use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "incident-classifier",
    version,
    about = "Zero-shot root-cause classification of incident reports"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/incident-classifier.toml")]
    pub(crate) config: PathBuf,
    /// Overrides `listen_addr` from the config file.
    #[arg(long)]
    pub(crate) listen_addr: Option<String>,
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}
