use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{GamecastError, GamecastResult};
use crate::http_client::{fetch_text, http_client};
use crate::video::{HighlightItem, PlaybackVariant};

const CONTENT_BASE: &str = "https://statsapi.mlb.com/api/v1/game";

pub fn game_content_url(game_pk: u64) -> String {
    format!("{CONTENT_BASE}/{game_pk}/content")
}

pub fn fetch_game_content(game_pk: u64) -> Result<Vec<HighlightItem>> {
    let client = http_client()?;
    let url = game_content_url(game_pk);
    let body = fetch_text(client, &url).context("game content request failed")?;
    let items = parse_game_content_json(&body)
        .with_context(|| format!("decoding game content for game {game_pk}"))?;
    tracing::debug!(game_pk, items = items.len(), "game content decoded");
    Ok(items)
}

/// Highlight items from a game content document. A document without a
/// highlights section simply has no highlights yet.
pub fn parse_game_content_json(raw: &str) -> GamecastResult<Vec<HighlightItem>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: RawContent = serde_json::from_str(trimmed)
        .map_err(|e| GamecastError::invalid_json("game content", e))?;
    let items = root
        .highlights
        .and_then(|h| h.highlights)
        .map(|h| h.items)
        .unwrap_or_default();

    items.into_iter().map(build_item).collect()
}

#[derive(Debug, Deserialize)]
struct RawContent {
    #[serde(default)]
    highlights: Option<RawHighlightsOuter>,
}

#[derive(Debug, Deserialize)]
struct RawHighlightsOuter {
    #[serde(default)]
    highlights: Option<RawHighlightsInner>,
}

#[derive(Debug, Deserialize)]
struct RawHighlightsInner {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    guid: Option<String>,
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    blurb: Option<String>,
    #[serde(default)]
    playbacks: Vec<RawPlayback>,
}

#[derive(Debug, Deserialize)]
struct RawPlayback {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

fn build_item(raw: RawItem) -> GamecastResult<HighlightItem> {
    let id = raw
        .id
        .or(raw.guid)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GamecastError::missing_field("highlight", "id"))?;
    let title = raw.headline.or(raw.title).unwrap_or_default();
    let playback_variants = raw
        .playbacks
        .into_iter()
        .enumerate()
        .map(|(idx, p)| PlaybackVariant::from_parts(&id, idx, p.name, p.url))
        .collect::<GamecastResult<Vec<_>>>()?;

    Ok(HighlightItem {
        id,
        title,
        blurb: raw.blurb.filter(|s| !s.trim().is_empty()),
        playback_variants,
    })
}
