use phipsi::engine::config::AnalysisConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    /// Set when a plot was requested.
    pub plot_output: Option<PathBuf>,
    pub plot_title: Option<String>,
    pub csv_output: Option<PathBuf>,
    pub summary: bool,
    pub core_config: AnalysisConfig,
}
