use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use tracing::warn;

use crate::controller::PlaybackController;
use crate::engine::EngineHost;
use crate::events::HostEvent;
use crate::model::PlayerModel;

mod event_loop;
mod input;
mod logging;
mod settings;
mod startup;

pub use event_loop::RuntimeMsg;


/// Run the player: UI commands on stdin, host events on stdout, logs on stderr.
pub fn run(book_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let (settings, config_problem) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(msg) = config_problem {
        warn!(target: event_loop::RUNTIME_LOG_TARGET, "{msg}");
    }

    let (inbox_tx, inbox_rx) = mpsc::channel::<RuntimeMsg>();
    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();

    let engine = EngineHost::spawn(
        inbox_tx.clone(),
        Duration::from_millis(settings.engine.tick_interval_ms),
    );
    let model = PlayerModel::new(settings.engine.volume_max, settings.engine.initial_volume);
    let mut controller = PlaybackController::new(model, engine.sender(), host_tx);

    let run_result = (|| -> anyhow::Result<()> {
        startup::apply_startup(&mut controller, &settings, book_dir.as_deref())?;
        input::spawn_reader(BufReader::new(io::stdin()), inbox_tx);

        let mut stdout = io::stdout().lock();
        event_loop::run(&mut controller, &inbox_rx, &host_rx, &settings, &mut stdout)?;
        Ok(())
    })();

    engine.shutdown();
    run_result
}
