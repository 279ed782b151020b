use std::collections::VecDeque;

use crate::player_api::{NewPlayer, Player, PlayerId};
use crate::render::{self, FormContainer, ListContainer};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Roster,
    AddPlayer,
    Details { id: PlayerId },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub selected: usize,
    pub list: ListContainer,
    pub form: FormContainer,
    /// Generation of the last refresh that reached the view.
    pub rendered_generation: u64,
    pub last_refresh: Option<String>,
    pub details: Option<Player>,
    pub details_loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Roster,
            selected: 0,
            list: ListContainer::new(),
            form: FormContainer::new(),
            rendered_generation: 0,
            last_refresh: None,
            details: None,
            details_loading: false,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn selected_player_id(&self) -> Option<PlayerId> {
        self.list.cards().get(self.selected).map(|card| card.id)
    }

    pub fn select_next(&mut self) {
        let total = self.list.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let total = self.list.len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn open_form(&mut self) {
        if self.form.bindings() == 0 {
            render::render_form(&mut self.form);
        }
        self.screen = Screen::AddPlayer;
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetPlayers {
        generation: u64,
        players: Vec<Player>,
    },
    RefreshFailed {
        generation: u64,
    },
    /// The server accepted this client's own submission.
    PlayerCreated,
    CreateFailed,
    SetDetails(Player),
    DetailsFailed {
        id: PlayerId,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    Create(NewPlayer),
    Remove(PlayerId),
    FetchDetails(PlayerId),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPlayers {
            generation,
            players,
        } => {
            if generation <= state.rendered_generation {
                state.push_log(format!("[INFO] Dropped stale refresh #{generation}"));
                return;
            }
            let selected_id = state.selected_player_id();
            state.rendered_generation = generation;
            render::render_list(&mut state.list, &players);
            render::render_form(&mut state.form);
            if let Some(id) = selected_id
                && let Some(idx) = state.list.cards().iter().position(|card| card.id == id)
            {
                state.selected = idx;
            }
            state.clamp_selection();
            state.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
        }
        Delta::RefreshFailed { generation } => {
            if generation <= state.rendered_generation {
                return;
            }
            // The list keeps whatever it showed before; only the form is rebuilt.
            state.rendered_generation = generation;
            render::render_form(&mut state.form);
        }
        Delta::PlayerCreated => {
            if state.screen == Screen::AddPlayer {
                state.screen = Screen::Roster;
            }
        }
        Delta::CreateFailed => state.form.release(),
        Delta::SetDetails(player) => {
            if state.screen == (Screen::Details { id: player.id }) {
                state.details = Some(player);
                state.details_loading = false;
            }
        }
        Delta::DetailsFailed { id } => {
            if state.screen == (Screen::Details { id }) {
                state.details_loading = false;
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
