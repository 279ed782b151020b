use puppy_bowl_terminal::player_api::Player;
use puppy_bowl_terminal::state::{AppState, Delta, Screen, apply_delta};

fn players(names: &[(u64, &str)]) -> Vec<Player> {
    names
        .iter()
        .map(|(id, name)| Player::new(*id, name, "Mutt", "http://x/p.png"))
        .collect()
}

#[test]
fn older_generation_is_not_rendered_over_newer() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 2,
            players: players(&[(1, "Rex"), (3, "Fido")]),
        },
    );
    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 1,
            players: players(&[(1, "Rex")]),
        },
    );

    assert_eq!(state.rendered_generation, 2);
    assert_eq!(state.list.len(), 2);
    assert!(state.list.card(3).is_some());
    assert!(
        state
            .logs
            .back()
            .is_some_and(|msg| msg.contains("stale refresh #1"))
    );
}

#[test]
fn failed_refresh_keeps_previous_list_and_renders_form() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 1,
            players: players(&[(1, "Rex"), (2, "Biscuit")]),
        },
    );
    state.form.form_mut().expect("form rendered").name = "typed".to_string();

    apply_delta(&mut state, Delta::RefreshFailed { generation: 2 });

    assert_eq!(state.list.len(), 2);
    assert_eq!(state.form.bindings(), 1);
    assert_eq!(state.form.form().expect("form rendered").name, "");
    assert_eq!(state.rendered_generation, 2);
}

#[test]
fn refresh_keeps_selection_on_same_player() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 1,
            players: players(&[(1, "Rex"), (2, "Biscuit"), (3, "Mochi")]),
        },
    );
    state.select_next();
    state.select_next();
    assert_eq!(state.selected_player_id(), Some(3));

    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 2,
            players: players(&[(2, "Biscuit"), (3, "Mochi")]),
        },
    );
    assert_eq!(state.selected_player_id(), Some(3));

    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 3,
            players: players(&[(2, "Biscuit")]),
        },
    );
    assert_eq!(state.selected, 0);
    assert_eq!(state.selected_player_id(), Some(2));
}

#[test]
fn background_refresh_leaves_form_screen_open() {
    let mut state = AppState::new();
    state.open_form();
    assert_eq!(state.screen, Screen::AddPlayer);
    assert_eq!(state.form.bindings(), 1);

    apply_delta(
        &mut state,
        Delta::SetPlayers {
            generation: 1,
            players: players(&[(1, "Rex")]),
        },
    );
    assert_eq!(state.screen, Screen::AddPlayer);
    assert_eq!(state.form.bindings(), 1);
    assert!(state.last_refresh.is_some());
}

#[test]
fn own_create_closes_form_screen() {
    let mut state = AppState::new();
    state.open_form();

    apply_delta(&mut state, Delta::PlayerCreated);
    assert_eq!(state.screen, Screen::Roster);

    state.screen = Screen::Details { id: 4 };
    apply_delta(&mut state, Delta::PlayerCreated);
    assert_eq!(state.screen, Screen::Details { id: 4 });
}

#[test]
fn details_only_apply_to_the_open_player() {
    let mut state = AppState::new();
    state.screen = Screen::Details { id: 7 };
    state.details_loading = true;

    apply_delta(
        &mut state,
        Delta::SetDetails(Player::new(8, "Other", "Pug", "http://x/o.png")),
    );
    assert!(state.details.is_none());
    assert!(state.details_loading);

    apply_delta(
        &mut state,
        Delta::SetDetails(Player::new(7, "Seven", "Pug", "http://x/7.png")),
    );
    assert_eq!(state.details.as_ref().map(|p| p.id), Some(7));
    assert!(!state.details_loading);
}

#[test]
fn log_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
