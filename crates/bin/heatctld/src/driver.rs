//! Stdin driver — every line `entity_id value` updates the registry.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use heatctl_adapter_memory::InMemoryRegistry;
use heatctl_app::ports::EventPublisher;
use heatctl_domain::error::HeatingError;

/// A line that is neither blank, a comment nor an assignment.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("missing value for `{0}`")]
    MissingValue(String),
}

/// Parse one input line. `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<(&str, &str)>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    match line.split_once(char::is_whitespace) {
        Some((entity, value)) if !value.trim().is_empty() => Ok(Some((entity, value.trim()))),
        _ => Err(CommandError::MissingValue(
            line.split_whitespace().next().unwrap_or(line).to_string(),
        )),
    }
}

/// Apply every line of `input` to the registry until end of input.
///
/// Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns an error if reading fails or the registry cannot publish the
/// resulting change.
pub async fn drive<R, P>(input: R, registry: &InMemoryRegistry<P>) -> Result<usize, DriveError>
where
    R: AsyncBufRead + Unpin,
    P: EventPublisher + Send + Sync,
{
    let mut lines = input.lines();
    let mut applied = 0;
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some((entity, value))) => {
                if registry.set_state(entity, value).await? {
                    applied += 1;
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%line, error = %err, "ignoring malformed line"),
        }
    }
    tracing::info!(applied, "end of input");
    Ok(applied)
}

/// Failure while driving the registry.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] HeatingError),
}
