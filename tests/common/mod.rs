#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;

use anyhow::{Result, anyhow};

use puppy_bowl_terminal::player_api::{NewPlayer, Player, PlayerApi, PlayerId, RemoveOutcome};
use puppy_bowl_terminal::state::{AppState, Delta, apply_delta};

/// In-memory stand-in for the remote collection.
pub struct MemoryPlayers {
    pub players: Mutex<Vec<Player>>,
    next_id: AtomicU64,
    pub fail_fetch: AtomicBool,
    pub reject_create: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl MemoryPlayers {
    pub fn new(players: Vec<Player>) -> Self {
        let next_id = players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            players: Mutex::new(players),
            next_id: AtomicU64::new(next_id),
            fail_fetch: AtomicBool::new(false),
            reject_create: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            Player::new(1, "Rex", "Boxer", "http://x/rex.png"),
            Player::new(2, "Biscuit", "Corgi", "http://x/biscuit.png"),
        ])
    }
}

impl PlayerApi for MemoryPlayers {
    fn fetch_all(&self) -> Result<Vec<Player>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.players.lock().unwrap().clone())
    }

    fn fetch_one(&self, id: PlayerId) -> Result<Player> {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("api error: player #{id} not found"))
    }

    fn create(&self, player: &NewPlayer) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_create.load(Ordering::SeqCst) {
            return Err(anyhow!("failed to add player: http 400 Bad Request"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.players.lock().unwrap().push(Player::new(
            id,
            &player.name,
            &player.breed,
            &player.image_url,
        ));
        Ok(())
    }

    fn remove(&self, id: PlayerId) -> Result<RemoveOutcome> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        let mut players = self.players.lock().unwrap();
        let before = players.len();
        players.retain(|p| p.id != id);
        if players.len() == before {
            Ok(RemoveOutcome::Rejected(404))
        } else {
            Ok(RemoveOutcome::Removed)
        }
    }
}

pub fn drain_into(state: &mut AppState, rx: &Receiver<Delta>) -> Vec<String> {
    let mut logs = Vec::new();
    while let Ok(delta) = rx.try_recv() {
        if let Delta::Log(msg) = &delta {
            logs.push(msg.clone());
        }
        apply_delta(state, delta);
    }
    logs
}
