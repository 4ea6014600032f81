use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "logtally",
    about = "Summarize access logs by endpoint, minute and status code"
)]
pub struct Cli {
    /// Log files or directories (directories are searched for *.log).
    /// Falls back to `files` from the config file.
    pub paths: Vec<PathBuf>,

    /// Output format: table (default), json
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,

    /// Only show the N most called endpoints
    #[arg(long)]
    pub top: Option<usize>,

    /// Skip files that cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Config file (default: <config dir>/logtally/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// More log output on stderr; repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["logtally"]).unwrap();
        assert!(cli.paths.is_empty());
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.top, None);
        assert!(!cli.skip_unreadable);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_paths_and_flags() {
        let cli = Cli::try_parse_from([
            "logtally",
            "api-dev-out.log",
            "logs",
            "--format",
            "json",
            "--top",
            "5",
            "--skip-unreadable",
            "-vv",
        ])
        .unwrap();
        assert_eq!(
            cli.paths,
            vec![PathBuf::from("api-dev-out.log"), PathBuf::from("logs")]
        );
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.top, Some(5));
        assert!(cli.skip_unreadable);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["logtally", "--format", "csv"]).is_err());
    }
}
