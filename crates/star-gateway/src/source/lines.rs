//! Newline-delimited JSON event source

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use star_common::{AppError, AppResult};
use star_core::StarEvent;

/// Parse one line of input; blank lines yield `None`
pub fn parse_line(line: &str) -> AppResult<Option<StarEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| AppError::MalformedEvent(e.to_string()))
}

/// Forward every event read from `reader` into `events`
///
/// Malformed lines are logged and skipped. Returns the number of events
/// forwarded once the input ends or the receiver goes away.
pub async fn pump_lines<R>(mut reader: R, events: mpsc::Sender<StarEvent>) -> AppResult<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut forwarded = 0;
    let mut line_no = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let decoded = std::str::from_utf8(&buf)
            .map_err(|e| AppError::MalformedEvent(e.to_string()))
            .and_then(parse_line);
        let event = match decoded {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                warn!(line = line_no, error = %err, "Skipping malformed event");
                continue;
            }
        };

        if events.send(event).await.is_err() {
            debug!("Dispatcher gone, stopping event source");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}
