use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::http_client::http_client;

pub type PlayerId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub cohort_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, breed: &str, image_url: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            breed: breed.to_string(),
            image_url: image_url.to_string(),
            status: None,
            team_id: None,
            cohort_id: None,
            created_at: None,
        }
    }
}

/// Creation payload; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,
    pub breed: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The request went through but the server answered with a non-success status.
    Rejected(u16),
}

/// Read/create/delete against the remote player collection.
pub trait PlayerApi: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<Player>>;
    fn fetch_one(&self, id: PlayerId) -> Result<Player>;
    fn create(&self, player: &NewPlayer) -> Result<()>;
    fn remove(&self, id: PlayerId) -> Result<RemoveOutcome>;
}

#[derive(Debug, Clone)]
pub struct RemotePlayers {
    endpoint: String,
    timeout: Duration,
}

impl RemotePlayers {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn player_url(&self, id: PlayerId) -> String {
        format!("{}/{id}", self.endpoint)
    }
}

impl PlayerApi for RemotePlayers {
    fn fetch_all(&self) -> Result<Vec<Player>> {
        let client = http_client(self.timeout)?;
        tracing::debug!(url = %self.endpoint, "fetching players");
        let resp = client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let body = resp.text().context("failed reading body")?;
        parse_players_json(&body)
    }

    fn fetch_one(&self, id: PlayerId) -> Result<Player> {
        let client = http_client(self.timeout)?;
        let url = self.player_url(id);
        tracing::debug!(%url, "fetching player");
        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let body = resp.text().context("failed reading body")?;
        parse_player_json(&body)
    }

    fn create(&self, player: &NewPlayer) -> Result<()> {
        let client = http_client(self.timeout)?;
        tracing::debug!(url = %self.endpoint, name = %player.name, "creating player");
        let resp = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(player)
            .send()
            .context("request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let detail = api_error_message(&body).unwrap_or(body);
            tracing::warn!(%status, "player creation rejected");
            return Err(anyhow!("failed to add player: http {status}: {detail}"));
        }
        Ok(())
    }

    fn remove(&self, id: PlayerId) -> Result<RemoveOutcome> {
        let client = http_client(self.timeout)?;
        let url = self.player_url(id);
        tracing::debug!(%url, "removing player");
        let resp = client.delete(&url).send().context("request failed")?;
        let status = resp.status();
        if status.is_success() {
            Ok(RemoveOutcome::Removed)
        } else {
            tracing::warn!(%status, id, "player removal answered with error status");
            Ok(RemoveOutcome::Rejected(status.as_u16()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayersData {
    #[serde(default)]
    players: Option<Vec<Player>>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerData {
    #[serde(default)]
    player: Option<Player>,
}

/// Parses `{ data: { players: [...] } }`. A missing list is an error, not an empty roster.
pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    let envelope: Envelope<PlayersData> =
        serde_json::from_str(raw.trim()).context("invalid players json")?;
    check_success(&envelope)?;
    envelope
        .data
        .and_then(|data| data.players)
        .ok_or_else(|| anyhow!("response has no data.players"))
}

pub fn parse_player_json(raw: &str) -> Result<Player> {
    let envelope: Envelope<PlayerData> =
        serde_json::from_str(raw.trim()).context("invalid player json")?;
    check_success(&envelope)?;
    envelope
        .data
        .and_then(|data| data.player)
        .ok_or_else(|| anyhow!("response has no data.player"))
}

fn check_success<T>(envelope: &Envelope<T>) -> Result<()> {
    if envelope.success == Some(false) {
        let message = envelope
            .error
            .as_ref()
            .and_then(error_value_message)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(anyhow!("api error: {message}"));
    }
    Ok(())
}

fn api_error_message(raw: &str) -> Option<String> {
    let root: Value = serde_json::from_str(raw.trim()).ok()?;
    root.get("error").and_then(error_value_message)
}

fn error_value_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
