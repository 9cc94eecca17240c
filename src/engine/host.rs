use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineEvent};

/// Handle to the engine thread.
///
/// Commands go in through `sender()`; events come back on the channel passed
/// to `spawn`.
pub struct EngineHost {
    tx: Sender<EngineCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl EngineHost {
    /// Start the engine thread. Events are converted into `T` and pushed to `events`.
    pub fn spawn<T>(events: Sender<T>, tick_interval: Duration) -> Self
    where
        T: From<EngineEvent> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let handle = spawn_engine_thread(rx, events, tick_interval);

        Self {
            tx,
            join: Mutex::new(Some(handle)),
        }
    }

    /// A command sender for the controller.
    pub fn sender(&self) -> Sender<EngineCmd> {
        self.tx.clone()
    }

    /// Ask the engine to stop and wait for its thread to exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(EngineCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
