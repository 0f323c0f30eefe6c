//! Sleeper league alert bot.
//!
//! Runs one or all alert feeds once and exits. Meant to be scheduled
//! (cron, CI) so that runs of a feed never overlap.

mod config;
mod runner;

use clap::{Parser, Subcommand};
use config::{BotConfig, ChatSettings, SleeperSettings, StorageSettings};
use runner::{Feed, Runner};
use sleeper_alerts::DEFAULT_CHAT_URL;
use sleeper_feeds::SleeperConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Sleeper Bot CLI
#[derive(Parser, Debug)]
#[command(name = "sleeper-bot")]
#[command(about = "Posts Sleeper league alerts to the group chat", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Sleeper league ID
    #[arg(long, env = "SLEEPER_LEAGUE_ID", global = true)]
    league_id: Option<String>,

    /// Sleeper API root
    #[arg(long, env = "SLEEPER_API_URL", global = true, default_value = SleeperConfig::DEFAULT_BASE_URL)]
    sleeper_url: String,

    /// Sleeper request timeout in seconds
    #[arg(long, env = "SLEEPER_TIMEOUT_SECS", global = true, default_value_t = 30)]
    sleeper_timeout: u64,

    /// Chat API key; alerts are only logged without one
    #[arg(long, env = "CHAT_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Chat API endpoint
    #[arg(long, env = "CHAT_API_URL", global = true, default_value = DEFAULT_CHAT_URL)]
    chat_url: String,

    /// Week to check (default: current NFL week, or all weeks for transactions)
    #[arg(long, env = "CURRENT_WEEK", global = true)]
    week: Option<u32>,

    /// Directory holding the seen_<feed>.json snapshots
    #[arg(long, env = "STATE_DIR", global = true, default_value = ".")]
    state_dir: PathBuf,

    /// SQLite URL; stores snapshots in the database instead of files
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Announce new trades, waiver claims and free-agent moves
    Transactions,
    /// Announce injury report changes for rostered players
    Injuries,
    /// Warn teams about starters who will score zero
    Lineups,
    /// Celebrate big weekly performances
    BigPlays,
    /// Run every feed in sequence
    All,
}

impl Command {
    fn feeds(self) -> &'static [Feed] {
        match self {
            Command::Transactions => &[Feed::Transactions],
            Command::Injuries => &[Feed::Injuries],
            Command::Lineups => &[Feed::Lineups],
            Command::BigPlays => &[Feed::BigPlays],
            Command::All => &Feed::ALL,
        }
    }
}

impl Args {
    fn into_config(self) -> BotConfig {
        let storage = match self.database_url {
            Some(url) => StorageSettings::Sqlite { url },
            None => StorageSettings::Files {
                dir: self.state_dir,
            },
        };
        BotConfig {
            league_id: self.league_id.unwrap_or_default(),
            week: self.week,
            sleeper: SleeperSettings {
                base_url: self.sleeper_url,
                timeout_secs: self.sleeper_timeout,
            },
            chat: ChatSettings {
                url: self.chat_url,
                api_key: self.api_key,
            },
            storage,
            log_level: self.log_level,
        }
    }
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let command = args.command;
    let config = args.into_config();

    init_logging(&config.log_level);

    if config.league_id.trim().is_empty() {
        error!("SLEEPER_LEAGUE_ID is required (set it or pass --league-id)");
        return ExitCode::FAILURE;
    }

    info!("🏈 Sleeper bot starting...");
    info!("  League: {}", config.league_id);
    info!("  Command: {:?}", command);
    match config.week {
        Some(week) => info!("  Week: {}", week),
        None => info!("  Week: current"),
    }
    info!("  Storage: {:?}", config.storage);

    let runner = match Runner::from_config(&config).await {
        Ok(runner) => runner,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runner.announce_league().await;

    if runner.run_all(command.feeds()).await > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sleeper-bot", "injuries", "--league-id", "1180"]).unwrap();
        assert_eq!(args.command, Command::Injuries);

        let config = args.into_config();
        assert_eq!(config.league_id, "1180");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.chat.url, DEFAULT_CHAT_URL);
        assert_eq!(config.sleeper.base_url, SleeperConfig::DEFAULT_BASE_URL);
        assert_eq!(config.sleeper.timeout_secs, 30);
    }

    #[test]
    fn test_sleeper_overrides() {
        let args = Args::try_parse_from([
            "sleeper-bot",
            "lineups",
            "--league-id",
            "1180",
            "--sleeper-url",
            "http://127.0.0.1:8080/v1",
            "--sleeper-timeout",
            "5",
        ])
        .unwrap();

        let sleeper = args.into_config().sleeper_config();
        assert_eq!(sleeper.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(sleeper.timeout, std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_database_url_selects_sqlite() {
        let args = Args::try_parse_from([
            "sleeper-bot",
            "--league-id",
            "1180",
            "--database-url",
            "sqlite://state.db",
            "--week",
            "7",
            "all",
        ])
        .unwrap();
        assert_eq!(args.command.feeds(), &Feed::ALL);

        let config = args.into_config();
        assert_eq!(config.week, Some(7));
        assert_eq!(
            config.storage,
            StorageSettings::Sqlite {
                url: "sqlite://state.db".to_string()
            }
        );
    }

    #[test]
    fn test_state_dir() {
        let args = Args::try_parse_from([
            "sleeper-bot",
            "big-plays",
            "--league-id",
            "1180",
            "--state-dir",
            "/var/lib/sleeper",
        ])
        .unwrap();
        assert_eq!(args.command.feeds(), &[Feed::BigPlays]);
        assert_eq!(
            args.into_config().storage,
            StorageSettings::Files {
                dir: PathBuf::from("/var/lib/sleeper")
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["sleeper-bot", "--league-id", "1180"]).is_err());
    }
}
