use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::warn;

use crate::events::UiCommand;

use super::event_loop::{RUNTIME_LOG_TARGET, RuntimeMsg};

/// Parse one input line. Blank lines yield `None`; bad lines are logged and skipped.
pub(super) fn parse_line(line: &str) -> Option<UiCommand> {
    if line.trim().is_empty() {
        return None;
    }
    match UiCommand::from_json_line(line) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            warn!(target: RUNTIME_LOG_TARGET, "ignoring input line: {e}");
            None
        }
    }
}

/// Read UI commands from `reader` on a background thread, one JSON object per line.
pub(super) fn spawn_reader<R>(reader: R, tx: Sender<RuntimeMsg>)
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(target: RUNTIME_LOG_TARGET, "input read failed: {e}");
                    break;
                }
            };
            if let Some(cmd) = parse_line(&line) {
                if tx.send(RuntimeMsg::Ui(cmd)).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(RuntimeMsg::InputClosed);
    });
}
