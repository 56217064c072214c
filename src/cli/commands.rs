//! CLI command implementations
//!
//! Boot order: logging, arguments, tokio runtime, store, then the command.
//! The PostgreSQL pool is created here, handed to the server, and closed
//! after the server stops.

use std::sync::Arc;

use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logging, LogConfig};
use crate::store::{DatabaseConfig, LessonStore, MemoryLessonStore, PgLessonStore};
use crate::tree::build_tree;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(LogConfig {
        verbose: cli.verbose,
    });
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    match cmd {
        Command::Serve {
            http,
            database,
            memory,
        } => rt.block_on(serve(http.into(), database.into(), memory)),
        Command::Dump { database } => rt.block_on(dump(database.into())),
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn serve(
    http_config: HttpServerConfig,
    db_config: DatabaseConfig,
    memory: bool,
) -> CliResult<()> {
    if memory {
        info!("Using in-memory store");
        let store = Arc::new(MemoryLessonStore::new());
        return run_server(http_config, store).await;
    }

    let store = Arc::new(PgLessonStore::connect(&db_config).await?);
    let result = run_server(http_config, Arc::clone(&store)).await;
    store.close().await;
    result
}

async fn run_server<S: LessonStore + 'static>(
    config: HttpServerConfig,
    store: Arc<S>,
) -> CliResult<()> {
    HttpServer::with_config(config, store)
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Run the aggregate query once and print the tree
pub async fn dump(db_config: DatabaseConfig) -> CliResult<()> {
    let store = PgLessonStore::connect(&db_config).await?;
    let result = dump_store(&store).await;
    store.close().await;
    result
}

/// Print the tree held by `store` to stdout.
pub async fn dump_store<S: LessonStore>(store: &S) -> CliResult<()> {
    let rows = store.fetch_tree_rows().await?;
    let tree = build_tree(rows);
    info!(super_lessons = tree.len(), "Dumping lesson tree");
    write_json(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewSuperLesson;

    #[tokio::test]
    async fn test_dump_memory_store() {
        let store = MemoryLessonStore::new();
        store
            .create_super_lesson(NewSuperLesson {
                title: "Algebra".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert!(dump_store(&store).await.is_ok());
    }
}
