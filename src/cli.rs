use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// Inspect the chat history persisted by `chat_state`
#[derive(Parser, Debug)]
#[command(name = "chat_state", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Storage key the chat history is kept under
    #[arg(long, env = "CHAT_STORAGE_KEY", global = true)]
    pub storage_key: Option<String>,

    /// Directory holding the stored files
    #[arg(long, env = "CHAT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the page data (`{"chatMsg": [...]}`) as JSON (default)
    Show,
    /// Remove the stored chat history
    Clear,
}

impl Cli {
    pub fn action(&self) -> Command {
        self.command.unwrap_or(Command::Show)
    }

    pub fn config(&self) -> Config {
        Config::with_overrides(self.storage_key.clone(), self.data_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_subcommand_shows() {
        let cli = Cli::try_parse_from(["chat_state"]).unwrap();
        assert_eq!(cli.action(), Command::Show);
    }

    #[test]
    fn clear_with_flags_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "chat_state",
            "clear",
            "--storage-key",
            "history",
            "--data-dir",
            "/tmp/chats",
        ])
        .unwrap();
        assert_eq!(cli.action(), Command::Clear);
        assert_eq!(
            cli.config(),
            Config { storage_key: "history".into(), data_dir: "/tmp/chats".into() }
        );
    }

    #[test]
    fn help_is_available() {
        let err = Cli::try_parse_from(["chat_state", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("clear"));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let err = Cli::try_parse_from(["chat_state", "purge"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
