use clap::{Args, Parser, Subcommand, ValueEnum};
use kassa_core::{PipelineOptions, SortOrder};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kassa",
    version,
    about = "Filter and report bank transactions from JSON, CSV or XLSX exports",
    long_about = "Filter and report bank transactions from JSON, CSV or XLSX exports.\n\n\
Run without a command for the interactive menu."
)]
pub struct Cli {
    /// Settings file (defaults to ./kassa.toml, then the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a report for one file without prompting.
    Report(ReportArgs),
    /// Print card numbers from START to END, grouped by four digits.
    Cards { start: u64, end: u64 },
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// JSON, CSV or XLSX file with transactions.
    pub path: PathBuf,

    /// Status to keep (EXECUTED, CANCELED, PENDING). Defaults to the configured status.
    #[arg(long)]
    pub status: Option<String>,

    /// Sort by date.
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Keep only rouble transactions.
    #[arg(long)]
    pub rub_only: bool,

    /// Keep only transactions whose description contains this word.
    #[arg(long, value_name = "WORD")]
    pub search: Option<String>,

    /// Append counts by status, currency and configured category.
    #[arg(long)]
    pub summary: bool,

    /// Append the selection total converted to roubles.
    #[arg(long)]
    pub convert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Ascending,
            SortArg::Desc => SortOrder::Descending,
        }
    }
}

impl ReportArgs {
    pub fn pipeline_options(&self, default_status: &str) -> PipelineOptions {
        PipelineOptions {
            state: self
                .status
                .as_deref()
                .unwrap_or(default_status)
                .trim()
                .to_uppercase(),
            sort: self.sort.map(SortOrder::from),
            rub_only: self.rub_only,
            search: self.search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn no_command_means_interactive() {
        let cli = parse(&["kassa"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn report_with_all_flags() {
        let cli = parse(&[
            "kassa",
            "report",
            "ops.json",
            "--status",
            "canceled",
            "--sort",
            "asc",
            "--rub-only",
            "--search",
            "Перевод",
            "--summary",
            "--config",
            "my.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        let Some(Command::Report(args)) = cli.command else {
            panic!("expected report command");
        };
        assert!(args.summary);
        assert!(!args.convert);
        let options = args.pipeline_options("EXECUTED");
        assert_eq!(options.state, "CANCELED");
        assert_eq!(options.sort, Some(SortOrder::Ascending));
        assert!(options.rub_only);
        assert_eq!(options.search.as_deref(), Some("Перевод"));
    }

    #[test]
    fn report_defaults_to_configured_status() {
        let cli = parse(&["kassa", "report", "ops.csv"]);
        let Some(Command::Report(args)) = cli.command else {
            panic!("expected report command");
        };
        let options = args.pipeline_options("PENDING");
        assert_eq!(options.state, "PENDING");
        assert_eq!(options.sort, None);
        assert!(!options.rub_only);
        assert_eq!(options.search, None);
    }

    #[test]
    fn cards_takes_range() {
        let cli = parse(&["kassa", "cards", "1", "5"]);
        assert!(matches!(cli.command, Some(Command::Cards { start: 1, end: 5 })));
    }

    #[test]
    fn rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["kassa", "report", "x.json", "--sort", "sideways"]).is_err());
    }
}
