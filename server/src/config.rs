//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use todo_core::{InMemoryTodoRepository, RepoError, SqliteTodoRepository, TodoRepository};
use tracing::Level;

use crate::logging::LogConfig;

/// Backing store for the todo collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Storage {
    /// SQLite database file at `--database`.
    Sqlite,
    /// Process memory; nothing survives a restart.
    Memory,
}

/// Todo server - JSON REST API over an ordered todo list
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "TODO_STORAGE", value_enum, default_value = "sqlite")]
    pub storage: Storage,

    /// SQLite database file, used with `--storage sqlite`
    #[arg(long, env = "TODO_DATABASE", default_value = "todos.db")]
    pub database: PathBuf,

    /// Scheme for response links when no X-Forwarded-Proto header is present
    #[arg(long, env = "TODO_PUBLIC_SCHEME", default_value = "http")]
    pub public_scheme: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,

    /// Emit JSON log lines
    #[arg(long, env = "TODO_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level,
            json_format: self.log_json,
        }
    }

    pub fn open_repository(&self) -> Result<Arc<dyn TodoRepository>, RepoError> {
        Ok(match self.storage {
            Storage::Sqlite => Arc::new(SqliteTodoRepository::open(&self.database)?),
            Storage::Memory => Arc::new(InMemoryTodoRepository::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["todo-server"]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.storage, Storage::Sqlite);
        assert_eq!(config.public_scheme, "http");
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.log_json);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "todo-server",
            "--port",
            "8080",
            "--storage",
            "memory",
            "--log-level",
            "debug",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.storage, Storage::Memory);
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.log_config().json_format);
    }

    #[test]
    fn unknown_storage_is_rejected() {
        assert!(Config::try_parse_from(["todo-server", "--storage", "postgres"]).is_err());
    }

    #[test]
    fn memory_storage_opens_without_touching_disk() {
        let config =
            Config::try_parse_from(["todo-server", "--storage", "memory"]).unwrap();
        assert!(config.open_repository().is_ok());
    }
}
