use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::player_api::{NewPlayer, PlayerApi, PlayerId, RemoveOutcome};
use crate::state::{Delta, ProviderCommand};

/// Runs the fetch/mutate/refresh cycle against a [`PlayerApi`] and reports back as [`Delta`]s.
///
/// Every refresh and every mutation bumps a shared generation counter when it starts. A
/// refresh whose generation is no longer current when its response arrives was overtaken
/// by a later mutation or refresh and is dropped instead of rendered.
pub struct AppController<A> {
    api: A,
    tx: Sender<Delta>,
    generation: AtomicU64,
    refreshes_in_flight: AtomicUsize,
    last_dropped: AtomicU64,
}

impl<A: PlayerApi> AppController<A> {
    pub fn new(api: A, tx: Sender<Delta>) -> Self {
        Self {
            api,
            tx,
            generation: AtomicU64::new(0),
            refreshes_in_flight: AtomicUsize::new(0),
            last_dropped: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch everything and hand it to the view. Never fails; problems end up in the log.
    pub fn init(&self) {
        self.refreshes_in_flight.fetch_add(1, Ordering::SeqCst);
        self.refresh();
        self.refreshes_in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.fetch_all();
        if self.current_generation() != generation {
            self.last_dropped.fetch_max(generation, Ordering::SeqCst);
            self.info(format!("[INFO] Refresh #{generation} overtaken, skipping render"));
            return;
        }
        match result {
            Ok(players) => {
                tracing::debug!(generation, count = players.len(), "refresh complete");
                let _ = self.tx.send(Delta::SetPlayers {
                    generation,
                    players,
                });
            }
            Err(err) => {
                self.warn(format!("[WARN] Trouble fetching players: {err:#}"));
                let _ = self.tx.send(Delta::RefreshFailed { generation });
            }
        }
    }

    /// Marks the start of a mutation; any refresh already in flight becomes stale.
    /// Returns the last dropped refresh seen so far, for [`Self::settle_failed_mutation`].
    fn begin_mutation(&self) -> u64 {
        let dropped = self.last_dropped.load(Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        dropped
    }

    /// A failed mutation has no refresh of its own. If it made an in-flight refresh stale,
    /// run a replacement so the view is not left waiting on a dropped one.
    fn settle_failed_mutation(&self, dropped_before: u64) {
        let in_flight = self.refreshes_in_flight.load(Ordering::SeqCst) > 0;
        let dropped = self.last_dropped.load(Ordering::SeqCst) != dropped_before;
        if in_flight || dropped {
            self.init();
        }
    }

    /// Submits a new player and refreshes only when the server accepted it.
    pub fn create(&self, player: &NewPlayer) {
        let dropped_before = self.begin_mutation();
        match self.api.create(player) {
            Ok(()) => {
                self.info(format!("[INFO] Added player {}", player.name));
                let _ = self.tx.send(Delta::PlayerCreated);
                self.init();
            }
            Err(err) => {
                self.warn(format!(
                    "[WARN] Something went wrong adding {}: {err:#}",
                    player.name
                ));
                let _ = self.tx.send(Delta::CreateFailed);
                self.settle_failed_mutation(dropped_before);
            }
        }
    }

    /// Deletes a player. Any answer from the server counts as done; only transport
    /// failures skip the refresh.
    pub fn remove(&self, id: PlayerId) {
        let dropped_before = self.begin_mutation();
        match self.api.remove(id) {
            Ok(RemoveOutcome::Removed) => {
                self.info(format!("[INFO] Removed player #{id}"));
                self.init();
            }
            Ok(RemoveOutcome::Rejected(status)) => {
                self.warn(format!("[WARN] Remove #{id} answered http {status}"));
                self.init();
            }
            Err(err) => {
                self.warn(format!("[WARN] Trouble removing player #{id}: {err:#}"));
                self.settle_failed_mutation(dropped_before);
            }
        }
    }

    pub fn fetch_details(&self, id: PlayerId) {
        match self.api.fetch_one(id) {
            Ok(player) => {
                let _ = self.tx.send(Delta::SetDetails(player));
            }
            Err(err) => {
                self.warn(format!("[WARN] Trouble fetching player #{id}: {err:#}"));
                let _ = self.tx.send(Delta::DetailsFailed { id });
            }
        }
    }

    pub fn dispatch(&self, cmd: ProviderCommand) {
        match cmd {
            ProviderCommand::Refresh => self.init(),
            ProviderCommand::Create(player) => self.create(&player),
            ProviderCommand::Remove(id) => self.remove(id),
            ProviderCommand::FetchDetails(id) => self.fetch_details(id),
        }
    }

    fn info(&self, msg: String) {
        tracing::info!("{msg}");
        let _ = self.tx.send(Delta::Log(msg));
    }

    fn warn(&self, msg: String) {
        tracing::warn!("{msg}");
        let _ = self.tx.send(Delta::Log(msg));
    }
}

/// Where "view details" sends the user: `<details_path>?id=<id>`.
pub fn details_destination(details_path: &str, id: PlayerId) -> String {
    format!("{details_path}?id={id}")
}

/// Starts the provider thread. It runs the initial refresh, then one worker per
/// command, so a slow request never blocks the next one. Exits once `cmd_rx` hangs up.
pub fn spawn_controller<A>(
    api: A,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()>
where
    A: PlayerApi + 'static,
{
    let controller = Arc::new(AppController::new(api, tx));
    thread::spawn(move || {
        let startup = Arc::clone(&controller);
        thread::spawn(move || startup.init());

        while let Ok(cmd) = cmd_rx.recv() {
            let worker = Arc::clone(&controller);
            thread::spawn(move || worker.dispatch(cmd));
        }
    })
}
