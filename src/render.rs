use anyhow::{Context, Result};
use askama::Template;

use crate::player_api::{NewPlayer, Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    ViewDetails(PlayerId),
    Remove(PlayerId),
}

impl CardAction {
    pub fn player_id(self) -> PlayerId {
        match self {
            CardAction::ViewDetails(id) | CardAction::Remove(id) => id,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardAction::ViewDetails(_) => "See Details",
            CardAction::Remove(_) => "Remove",
        }
    }

    fn html_name(self) -> &'static str {
        match self {
            CardAction::ViewDetails(_) => "view-details",
            CardAction::Remove(_) => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub id: PlayerId,
    pub name: String,
    pub breed_line: String,
    pub image_url: String,
    pub actions: [CardAction; 2],
}

impl PlayerCard {
    fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            breed_line: format!("Breed: {}", player.breed),
            image_url: player.image_url.clone(),
            actions: [CardAction::ViewDetails(player.id), CardAction::Remove(player.id)],
        }
    }

    /// Text a reader sees on the card, one line per element.
    pub fn visible_text(&self) -> String {
        let buttons = self
            .actions
            .iter()
            .map(|action| action.label())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n{}\n{buttons}", self.name, self.breed_line)
    }
}

/// Display surface for the player list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContainer {
    cards: Vec<PlayerCard>,
}

impl ListContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn append(&mut self, card: PlayerCard) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[PlayerCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, id: PlayerId) -> Option<&PlayerCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn to_html(&self) -> Result<String> {
        CardsTemplate { cards: &self.cards }
            .render()
            .context("failed to render player cards")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Breed,
    ImageUrl,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Breed, FormField::ImageUrl];

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Player Name",
            FormField::Breed => "Breed",
            FormField::ImageUrl => "Image URL",
        }
    }

    fn html_id(self) -> &'static str {
        match self {
            FormField::Name => "playerName",
            FormField::Breed => "playerBreed",
            FormField::ImageUrl => "playerImage",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Breed,
            FormField::Breed => FormField::ImageUrl,
            FormField::ImageUrl => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::ImageUrl,
            FormField::Breed => FormField::Name,
            FormField::ImageUrl => FormField::Breed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub breed: String,
    pub image_url: String,
    pub focus: FormField,
    pending: bool,
}

impl CreateForm {
    fn new() -> Self {
        Self {
            name: String::new(),
            breed: String::new(),
            image_url: String::new(),
            focus: FormField::Name,
            pending: false,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Breed => &self.breed,
            FormField::ImageUrl => &self.image_url,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Breed => &mut self.breed,
            FormField::ImageUrl => &mut self.image_url,
        }
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).is_empty())
            .collect()
    }

    /// True while a submission is waiting for the server.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Display surface for the creation form. Holds at most one bound form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormContainer {
    form: Option<CreateForm>,
}

impl FormContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> Option<&CreateForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut CreateForm> {
        self.form.as_mut()
    }

    /// Number of live submit bindings; zero before the first render, one after.
    pub fn bindings(&self) -> usize {
        usize::from(self.form.is_some())
    }

    /// Reads the three inputs. Yields nothing when a required field is empty or a
    /// previous submission has not been answered yet.
    pub fn submit(&mut self) -> Option<NewPlayer> {
        let form = self.form.as_mut()?;
        if form.pending || !form.missing_fields().is_empty() {
            return None;
        }
        form.pending = true;
        Some(NewPlayer {
            name: form.name.clone(),
            breed: form.breed.clone(),
            image_url: form.image_url.clone(),
        })
    }

    /// Re-enables submission after a failed create; the typed values stay.
    pub fn release(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.pending = false;
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let Some(form) = &self.form else {
            return Ok(String::new());
        };
        let inputs = FormField::ALL
            .into_iter()
            .map(|field| FormInput {
                id: field.html_id(),
                placeholder: field.placeholder(),
                value: form.value(field),
            })
            .collect();
        FormTemplate { inputs }
            .render()
            .context("failed to render player form")
    }
}

/// Replaces the container's content with one card per player, in order.
pub fn render_list(container: &mut ListContainer, players: &[Player]) {
    container.clear();
    for player in players {
        container.append(PlayerCard::from_player(player));
    }
}

/// Replaces any existing form (and its binding) with a fresh, empty one.
pub fn render_form(container: &mut FormContainer) {
    container.form = Some(CreateForm::new());
}

pub fn render_page(title: &str, list: &ListContainer, form: &FormContainer) -> Result<String> {
    let form_html = form.to_html()?;
    let cards_html = list.to_html()?;
    PageTemplate {
        title,
        form_html: &form_html,
        cards_html: &cards_html,
    }
    .render()
    .context("failed to render page")
}

#[derive(Template)]
#[template(path = "cards.html")]
struct CardsTemplate<'a> {
    cards: &'a [PlayerCard],
}

struct FormInput<'a> {
    id: &'static str,
    placeholder: &'static str,
    value: &'a str,
}

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate<'a> {
    inputs: Vec<FormInput<'a>>,
}

/// Both regions are pre-rendered (and escaped) by their own templates.
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    form_html: &'a str,
    cards_html: &'a str,
}
