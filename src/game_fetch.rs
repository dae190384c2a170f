use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::boxscore::TeamBoxscore;
use crate::error::{GamecastError, GamecastResult};
use crate::game::{GameFeed, InningLine, Linescore, TeamInfo, TeamTotals};
use crate::http_client::{fetch_text, http_client};
use crate::play::{
    Base, BaseOccupancy, BattedBallMetrics, Count, HalfInning, PlayRecord, RunnerEnd,
    RunnerMovement,
};

const STATSAPI_BASE: &str = "https://statsapi.mlb.com/api";

pub fn live_feed_url(game_pk: u64) -> String {
    format!("{STATSAPI_BASE}/v1.1/game/{game_pk}/feed/live")
}

pub fn fetch_live_feed(game_pk: u64) -> Result<GameFeed> {
    let client = http_client()?;
    let url = live_feed_url(game_pk);
    let body = fetch_text(client, &url).context("live feed request failed")?;
    let feed = parse_live_feed_json(&body)
        .with_context(|| format!("decoding live feed for game {game_pk}"))?;
    tracing::debug!(
        game_pk,
        plays = feed.plays.len(),
        status = %feed.status,
        "live feed decoded"
    );
    Ok(feed)
}

pub fn parse_live_feed_json(raw: &str) -> GamecastResult<GameFeed> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(GamecastError::EmptyDocument("live feed"));
    }
    let root: RawFeed = serde_json::from_str(trimmed)
        .map_err(|e| GamecastError::invalid_json("live feed", e))?;
    build_game_feed(root)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeed {
    #[serde(default)]
    game_pk: Option<u64>,
    #[serde(default)]
    game_data: Option<RawGameData>,
    #[serde(default)]
    live_data: RawLiveData,
}

#[derive(Debug, Deserialize)]
struct RawGameData {
    #[serde(default)]
    teams: Option<RawTeams>,
    #[serde(default)]
    status: RawStatus,
}

#[derive(Debug, Deserialize)]
struct RawTeams {
    away: Option<RawTeam>,
    home: Option<RawTeam>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    abbreviation: String,
    #[serde(default)]
    record: Option<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    #[serde(default)]
    detailed_state: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawLiveData {
    #[serde(default)]
    plays: RawPlays,
    #[serde(default)]
    linescore: Option<RawLinescore>,
    #[serde(default)]
    boxscore: Option<RawBoxscore>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlays {
    #[serde(default)]
    all_plays: Vec<Option<RawPlay>>,
    #[serde(default)]
    scoring_plays: Vec<usize>,
    #[serde(default)]
    current_play: Option<RawCurrentPlay>,
}

#[derive(Debug, Deserialize)]
struct RawCurrentPlay {
    #[serde(default)]
    count: Option<RawCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlay {
    #[serde(default)]
    about: Option<RawAbout>,
    #[serde(default)]
    result: RawResult,
    #[serde(default)]
    count: RawCount,
    #[serde(default)]
    matchup: RawMatchup,
    #[serde(default)]
    runners: Vec<RawRunner>,
    #[serde(default)]
    play_events: Vec<RawPlayEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAbout {
    inning: Option<u8>,
    half_inning: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    #[serde(default)]
    event: String,
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    description: String,
    home_score: Option<u16>,
    away_score: Option<u16>,
    rbi: Option<u8>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawCount {
    #[serde(default)]
    balls: u8,
    #[serde(default)]
    strikes: u8,
    #[serde(default)]
    outs: u8,
}

impl From<RawCount> for Count {
    fn from(raw: RawCount) -> Self {
        Count {
            balls: raw.balls,
            strikes: raw.strikes,
            outs: raw.outs,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawMatchup {
    #[serde(default)]
    batter: Option<RawPerson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    id: Option<u32>,
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRunner {
    #[serde(default)]
    movement: Option<RawMovement>,
}

#[derive(Debug, Deserialize)]
struct RawMovement {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayEvent {
    #[serde(default)]
    play_id: Option<String>,
    #[serde(default)]
    hit_data: Option<RawHitData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHitData {
    launch_speed: Option<f64>,
    launch_angle: Option<f64>,
    total_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawLinescore {
    #[serde(default)]
    innings: Vec<RawInning>,
    #[serde(default)]
    teams: Option<RawLinescoreTeams>,
    #[serde(default)]
    offense: Option<RawOffense>,
}

#[derive(Debug, Deserialize)]
struct RawInning {
    num: u8,
    #[serde(default)]
    away: Option<RawInningHalf>,
    #[serde(default)]
    home: Option<RawInningHalf>,
}

#[derive(Debug, Deserialize)]
struct RawInningHalf {
    runs: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawLinescoreTeams {
    #[serde(default)]
    away: RawTotals,
    #[serde(default)]
    home: RawTotals,
}

#[derive(Debug, Default, Deserialize)]
struct RawTotals {
    runs: Option<u16>,
    hits: Option<u16>,
    errors: Option<u16>,
}

impl From<RawTotals> for TeamTotals {
    fn from(raw: RawTotals) -> Self {
        TeamTotals {
            runs: raw.runs,
            hits: raw.hits,
            errors: raw.errors,
        }
    }
}

// Each base holds the runner object when occupied.
#[derive(Debug, Deserialize)]
struct RawOffense {
    #[serde(default)]
    first: Option<Value>,
    #[serde(default)]
    second: Option<Value>,
    #[serde(default)]
    third: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawBoxscore {
    #[serde(default)]
    teams: Option<RawBoxscoreTeams>,
}

#[derive(Debug, Deserialize)]
struct RawBoxscoreTeams {
    away: Option<TeamBoxscore>,
    home: Option<TeamBoxscore>,
}

fn build_game_feed(root: RawFeed) -> GamecastResult<GameFeed> {
    let game_data = root
        .game_data
        .ok_or_else(|| GamecastError::missing_field("live feed", "gameData"))?;
    let teams = game_data
        .teams
        .ok_or_else(|| GamecastError::missing_field("live feed", "gameData.teams"))?;
    let away = build_team(teams.away, "gameData.teams.away")?;
    let home = build_team(teams.home, "gameData.teams.home")?;

    let live = root.live_data;
    let plays = live
        .plays
        .all_plays
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| raw.ok_or(GamecastError::MissingPlay(idx)).and_then(build_play))
        .collect::<GamecastResult<Vec<_>>>()?;

    let scoring_plays = live
        .plays
        .scoring_plays
        .into_iter()
        .filter(|idx| {
            let in_range = *idx < plays.len();
            if !in_range {
                tracing::warn!(idx, total = plays.len(), "scoring play index out of range");
            }
            in_range
        })
        .collect();

    let current_count = live
        .plays
        .current_play
        .and_then(|p| p.count)
        .map(Count::from);

    let (away_boxscore, home_boxscore) = live
        .boxscore
        .and_then(|b| b.teams)
        .map(|t| (t.away, t.home))
        .unwrap_or((None, None));

    Ok(GameFeed {
        game_pk: root.game_pk,
        status: game_data.status.detailed_state,
        away,
        home,
        linescore: live.linescore.map(build_linescore),
        plays,
        scoring_plays,
        current_count,
        away_boxscore,
        home_boxscore,
    })
}

fn build_team(raw: Option<RawTeam>, field: &'static str) -> GamecastResult<TeamInfo> {
    let team = raw.ok_or_else(|| GamecastError::missing_field("live feed", field))?;
    let id = team
        .id
        .ok_or_else(|| GamecastError::missing_field("team", "id"))?;
    Ok(TeamInfo {
        id,
        name: team.name,
        abbreviation: team.abbreviation,
        record: team.record.and_then(|r| r.summary),
    })
}

fn build_play(raw: RawPlay) -> GamecastResult<PlayRecord> {
    let about = raw
        .about
        .ok_or_else(|| GamecastError::missing_field("play", "about"))?;
    let inning = about
        .inning
        .ok_or_else(|| GamecastError::missing_field("play", "about.inning"))?;
    let half_raw = about
        .half_inning
        .as_deref()
        .ok_or_else(|| GamecastError::missing_field("play", "about.halfInning"))?;
    let half_inning = HalfInning::parse(half_raw)
        .ok_or_else(|| GamecastError::invalid_value("play", "about.halfInning", half_raw))?;

    let runners = raw
        .runners
        .iter()
        .filter_map(|r| r.movement.as_ref())
        .map(|m| RunnerMovement {
            start: m.start.as_deref().and_then(Base::parse),
            end: m.end.as_deref().and_then(RunnerEnd::parse),
        })
        .collect();

    // Contact is recorded on the last pitch of the at-bat.
    let batted_ball_metrics = raw
        .play_events
        .iter()
        .rev()
        .find_map(|e| e.hit_data.as_ref())
        .map(|h| BattedBallMetrics {
            exit_velocity_mph: h.launch_speed,
            launch_angle_deg: h.launch_angle,
            distance_ft: h.total_distance,
        });
    let play_id = raw
        .play_events
        .iter()
        .rev()
        .find_map(|e| e.play_id.clone());

    let (batting_player_id, batter_name) = match raw.matchup.batter {
        Some(b) => (b.id, b.full_name),
        None => (None, None),
    };

    let event_type = raw
        .result
        .event_type
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| raw.result.event.clone());

    Ok(PlayRecord {
        inning,
        half_inning,
        batting_player_id,
        batter_name,
        event: raw.result.event,
        event_type,
        event_description: raw.result.description,
        count: raw.count.into(),
        runners,
        batted_ball_metrics,
        home_score: raw.result.home_score,
        away_score: raw.result.away_score,
        rbi: raw.result.rbi,
        play_id,
    })
}

fn build_linescore(raw: RawLinescore) -> Linescore {
    let (away, home): (TeamTotals, TeamTotals) = raw
        .teams
        .map(|t| (t.away.into(), t.home.into()))
        .unwrap_or_default();
    let offense = raw
        .offense
        .map(|o| BaseOccupancy {
            first: o.first.is_some(),
            second: o.second.is_some(),
            third: o.third.is_some(),
        })
        .unwrap_or_default();
    Linescore {
        innings: raw
            .innings
            .into_iter()
            .map(|i| InningLine {
                num: i.num,
                away_runs: i.away.and_then(|h| h.runs),
                home_runs: i.home.and_then(|h| h.runs),
            })
            .collect(),
        away,
        home,
        offense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "gamePk": 1,
        "gameData": {
            "teams": {
                "away": {"id": 10, "name": "Away", "abbreviation": "AWY"},
                "home": {"id": 20, "name": "Home", "abbreviation": "HOM"}
            },
            "status": {"detailedState": "Scheduled"}
        },
        "liveData": {}
    }"#;

    #[test]
    fn minimal_feed_parses_with_defaults() {
        let feed = parse_live_feed_json(MINIMAL).expect("minimal feed should parse");
        assert_eq!(feed.game_pk, Some(1));
        assert!(feed.plays.is_empty());
        assert!(feed.linescore.is_none());
        assert!(feed.current_count.is_none());
        assert_eq!(feed.away.abbreviation, "AWY");
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(matches!(
            parse_live_feed_json("  null "),
            Err(GamecastError::EmptyDocument(_))
        ));
    }

    #[test]
    fn missing_teams_is_reported() {
        let err = parse_live_feed_json(r#"{"gameData": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            GamecastError::MissingField {
                field: "gameData.teams",
                ..
            }
        ));
    }

    #[test]
    fn null_play_slot_is_reported() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"allPlays": [null]}}"#,
        );
        assert!(matches!(
            parse_live_feed_json(&raw),
            Err(GamecastError::MissingPlay(0))
        ));
    }

    #[test]
    fn play_without_inning_is_reported() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"allPlays": [{"about": {"halfInning": "top"}}]}}"#,
        );
        let err = parse_live_feed_json(&raw).unwrap_err();
        assert!(err.to_string().contains("about.inning"));
    }

    #[test]
    fn unknown_half_inning_is_an_invalid_value() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"allPlays": [{"about": {"inning": 3, "halfInning": "middle"}}]}}"#,
        );
        let err = parse_live_feed_json(&raw).unwrap_err();
        match err {
            GamecastError::InvalidValue { field, value, .. } => {
                assert_eq!(field, "about.halfInning");
                assert_eq!(value, "middle");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn absent_half_inning_is_still_missing() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"allPlays": [{"about": {"inning": 3}}]}}"#,
        );
        assert!(matches!(
            parse_live_feed_json(&raw),
            Err(GamecastError::MissingField {
                field: "about.halfInning",
                ..
            })
        ));
    }

    #[test]
    fn event_type_falls_back_to_event_name() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"allPlays": [
                {"about": {"inning": 1, "halfInning": "top"}, "result": {"event": "Groundout"}}
            ]}}"#,
        );
        let feed = parse_live_feed_json(&raw).unwrap();
        assert_eq!(feed.plays[0].event_type, "Groundout");
        assert!(feed.plays[0].batted_ball_metrics.is_none());
    }

    #[test]
    fn out_of_range_scoring_index_is_dropped() {
        let raw = MINIMAL.replace(
            r#""liveData": {}"#,
            r#""liveData": {"plays": {"scoringPlays": [0, 5], "allPlays": [
                {"about": {"inning": 1, "halfInning": "bottom"}, "result": {"eventType": "home_run"}}
            ]}}"#,
        );
        let feed = parse_live_feed_json(&raw).unwrap();
        assert_eq!(feed.scoring_plays, vec![0]);
    }
}
