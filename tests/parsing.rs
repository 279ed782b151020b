use std::fs;
use std::path::PathBuf;

use puppy_bowl_terminal::player_api::{parse_player_json, parse_players_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_players_fixture_in_server_order() {
    let raw = read_fixture("players.json");
    let players = parse_players_json(&raw).expect("fixture should parse");
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].id, 4821);
    assert_eq!(players[0].name, "Anise");
    assert_eq!(players[0].breed, "Shetland Sheepdog");
    assert_eq!(players[0].image_url, "http://r.mtdv.me/puppies/anise.jpg");
    assert_eq!(players[0].team_id, None);
    assert_eq!(players[1].id, 4822);
    assert_eq!(players[1].team_id, Some(312));
    assert_eq!(players[1].status.as_deref(), Some("field"));
}

#[test]
fn parses_single_player_fixture() {
    let raw = read_fixture("player.json");
    let player = parse_player_json(&raw).expect("fixture should parse");
    assert_eq!(player.id, 4822);
    assert_eq!(player.name, "Crumpet");
    assert_eq!(player.cohort_id, Some(181));
}

#[test]
fn unsuccessful_envelope_reports_server_message() {
    let raw = read_fixture("players_error.json");
    let err = parse_players_json(&raw).expect_err("error envelope should fail");
    assert!(err.to_string().contains("Cohort with name 9999-NOPE not found"));
}

#[test]
fn missing_players_list_is_an_error() {
    assert!(parse_players_json(r#"{"data":{}}"#).is_err());
    assert!(parse_players_json(r#"{"success":true}"#).is_err());
    assert!(parse_players_json("null").is_err());
}

#[test]
fn garbage_body_is_an_error() {
    let err = parse_players_json("<html>502 Bad Gateway</html>").expect_err("not json");
    assert!(err.to_string().contains("invalid players json"));
}

#[test]
fn empty_roster_parses_to_empty_list() {
    let players = parse_players_json(r#"{"data":{"players":[]}}"#).expect("should parse");
    assert!(players.is_empty());
}
