use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use puppy_bowl_terminal::config::Config;
use puppy_bowl_terminal::player_api::{PlayerApi, RemotePlayers};
use puppy_bowl_terminal::render::{
    FormContainer, ListContainer, render_form, render_list, render_page,
};

// One refresh cycle rendered as a static page. Writes to the given path, or stdout.
fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let out = std::env::args().nth(1).map(PathBuf::from);

    let api = RemotePlayers::new(&config);
    let players = api
        .fetch_all()
        .with_context(|| format!("fetching {}", api.endpoint()))?;

    let mut list = ListContainer::new();
    let mut form = FormContainer::new();
    render_list(&mut list, &players);
    render_form(&mut form);
    let page = render_page("Puppy Bowl", &list, &form)?;

    match out {
        Some(path) => {
            fs::write(&path, page).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} players to {}", list.len(), path.display());
        }
        None => print!("{page}"),
    }
    Ok(())
}
