//! Command-line interface parsing for dealfinder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dealfinder - find the cheapest current offer for video games
#[derive(Parser, Debug)]
#[command(name = "dealfinder")]
#[command(about = "Cheapest current game offers, cached locally")]
#[command(version)]
pub struct Cli {
    /// Offer history database (overrides DEALFINDER_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Look up the cheapest offer for one or more titles
    ///
    /// Examples:
    ///   dealfinder search "The Witcher 3"
    ///   dealfinder search "Hades, Celeste" "Civilization VI"
    Search {
        /// Titles to look up; each argument may hold several comma-separated titles
        #[arg(required = true, value_name = "TITLES")]
        titles: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the lookup for every title on the watchlist
    Refresh {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the watchlist
    Watch {
        #[command(subcommand)]
        action: WatchCommand,
    },

    /// Show every stored batch for a title
    History {
        /// Title as you would search it
        title: String,
    },

    /// Dump the whole offer history as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum WatchCommand {
    /// Add a title to the watchlist
    Add { title: String },
    /// List watched titles
    List,
}

/// Split comma-separated title arguments into individual titles.
///
/// Blank entries are dropped.
pub fn split_titles(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["dealfinder", "search", "Hades, Celeste", "Civilization VI"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Search { titles: vec!["Hades, Celeste".into(), "Civilization VI".into()], json: false }
        );
        assert!(cli.db.is_none());
    }

    #[test]
    fn test_parse_search_requires_titles() {
        assert!(Cli::try_parse_from(["dealfinder", "search"]).is_err());
    }

    #[test]
    fn test_parse_global_db_after_subcommand() {
        let cli = Cli::try_parse_from(["dealfinder", "refresh", "--json", "--db", "/tmp/x.sqlite"]).unwrap();
        assert_eq!(cli.command, Command::Refresh { json: true });
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.sqlite")));
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from(["dealfinder", "watch", "add", "Hades"]).unwrap();
        assert_eq!(cli.command, Command::Watch { action: WatchCommand::Add { title: "Hades".into() } });

        let cli = Cli::try_parse_from(["dealfinder", "watch", "list"]).unwrap();
        assert_eq!(cli.command, Command::Watch { action: WatchCommand::List });
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from(["dealfinder", "export", "-o", "offers.json"]).unwrap();
        assert_eq!(cli.command, Command::Export { output: Some(PathBuf::from("offers.json")) });
    }

    #[test]
    fn test_split_titles() {
        let args = vec!["Hades, Celeste".to_string(), " ,Civilization VI,".to_string()];
        assert_eq!(split_titles(&args), ["Hades", "Celeste", "Civilization VI"]);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
