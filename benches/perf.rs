use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use puppy_bowl_terminal::player_api::{Player, parse_players_json};
use puppy_bowl_terminal::render::{
    FormContainer, ListContainer, render_form, render_list, render_page,
};

const ROSTER_SIZE: u64 = 500;

fn sample_players() -> Vec<Player> {
    (1..=ROSTER_SIZE)
        .map(|id| {
            Player::new(
                id,
                &format!("Pup {id}"),
                "Labrador Retriever",
                &format!("http://example.com/pups/{id}.png"),
            )
        })
        .collect()
}

fn sample_json() -> String {
    let players = sample_players();
    serde_json::json!({
        "success": true,
        "error": null,
        "data": { "players": players },
    })
    .to_string()
}

fn bench_players_parse(c: &mut Criterion) {
    let raw = sample_json();
    c.bench_function("players_parse", |b| {
        b.iter(|| {
            let players = parse_players_json(black_box(&raw)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_render_list(c: &mut Criterion) {
    let players = sample_players();
    let mut list = ListContainer::new();
    c.bench_function("render_list", |b| {
        b.iter(|| {
            render_list(&mut list, black_box(&players));
            black_box(list.len());
        })
    });
}

fn bench_render_page(c: &mut Criterion) {
    let players = sample_players();
    let mut list = ListContainer::new();
    let mut form = FormContainer::new();
    render_list(&mut list, &players);
    render_form(&mut form);
    c.bench_function("render_page", |b| {
        b.iter(|| {
            let page = render_page("Puppy Bowl", black_box(&list), &form).unwrap();
            black_box(page.len());
        })
    });
}

criterion_group!(perf, bench_players_parse, bench_render_list, bench_render_page);
criterion_main!(perf);
