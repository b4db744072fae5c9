use dotastat_core::Dispatcher;
use serde_json::Value;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Runs the selected query and applies any client-side `--limit`.
pub async fn run(cli: &Cli, dispatcher: &Dispatcher) -> Result<Value, CliError> {
    let query = cli.command.to_query()?;
    debug!(query = %query, path = %query.path(), cache = ?cli.cache, "running query");

    let payload = dispatcher.query_with_mode(&query, cli.cache.into()).await?;
    Ok(match cli.command.limit() {
        Some(limit) => truncate(payload, limit),
        None => payload,
    })
}

fn truncate(payload: Value, limit: usize) -> Value {
    match payload {
        Value::Array(mut items) => {
            items.truncate(limit);
            Value::Array(items)
        }
        other => other,
    }
}
