use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Interactive project-management mind map")]
pub struct Cli {
    /// Open the detail panel on this topic at startup (e.g. `raci`).
    #[arg(long = "open", short = 'o', value_name = "TOPIC_ID")]
    pub open: Option<String>,

    /// Directory for `pmmap-tui.log`. Defaults to `~/.pmmap/log`.
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_open_and_log_dir() {
        let cli = Cli::parse_from(["pmmap-tui", "--open", "raci", "--log-dir", "/tmp/x"]);
        assert_eq!(cli.open.as_deref(), Some("raci"));
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn defaults_are_empty() {
        let cli = Cli::parse_from(["pmmap-tui"]);
        assert!(cli.open.is_none());
        assert!(cli.log_dir.is_none());
    }
}
