use std::collections::HashMap;

use serde::Deserialize;

use crate::game::headshot_url;

pub const BATTING_COLUMNS: [&str; 8] = ["Player", "AB", "R", "H", "RBI", "BB", "SO", "AVG"];
pub const PITCHING_COLUMNS: [&str; 8] = ["Player", "IP", "H", "R", "ER", "BB", "SO", "ERA"];

const DEFAULT_AVG: &str = ".000";
const DEFAULT_ERA: &str = "0.00";
const DEFAULT_IP: &str = "0.0";

/// One side of `liveData.boxscore.teams`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBoxscore {
    #[serde(default)]
    pub batters: Vec<u32>,
    #[serde(default)]
    pub pitchers: Vec<u32>,
    /// Keyed `ID{person id}`.
    #[serde(default)]
    pub players: HashMap<String, PlayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    #[serde(default)]
    pub person: Option<Person>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub stats: StatGroups,
    #[serde(default)]
    pub season_stats: StatGroups,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u32,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatGroups {
    #[serde(default)]
    pub batting: StatLine,
    #[serde(default)]
    pub pitching: StatLine,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    pub at_bats: Option<u32>,
    pub runs: Option<u32>,
    pub hits: Option<u32>,
    pub rbi: Option<u32>,
    pub base_on_balls: Option<u32>,
    pub strike_outs: Option<u32>,
    pub earned_runs: Option<u32>,
    pub innings_pitched: Option<String>,
    pub avg: Option<String>,
    pub era: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingLine {
    pub person_id: u32,
    pub name: String,
    pub position: String,
    pub headshot_url: String,
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub rbi: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub avg: String,
}

impl BattingLine {
    pub fn cells(&self) -> Vec<String> {
        vec![
            format!("{} {}", self.name, self.position),
            self.at_bats.to_string(),
            self.runs.to_string(),
            self.hits.to_string(),
            self.rbi.to_string(),
            self.walks.to_string(),
            self.strikeouts.to_string(),
            self.avg.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchingLine {
    pub person_id: u32,
    pub name: String,
    pub headshot_url: String,
    pub innings_pitched: String,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub era: String,
}

impl PitchingLine {
    pub fn cells(&self) -> Vec<String> {
        vec![
            format!("{} P", self.name),
            self.innings_pitched.clone(),
            self.hits.to_string(),
            self.runs.to_string(),
            self.earned_runs.to_string(),
            self.walks.to_string(),
            self.strikeouts.to_string(),
            self.era.clone(),
        ]
    }
}

impl TeamBoxscore {
    fn player(&self, id: u32) -> Option<(&PlayerEntry, &Person)> {
        let entry = self.players.get(&format!("ID{id}"))?;
        let person = entry.person.as_ref()?;
        Some((entry, person))
    }

    /// Lines in batting order. Pitchers who never came to the plate are left out.
    pub fn batting_lines(&self) -> Vec<BattingLine> {
        self.batters
            .iter()
            .filter_map(|id| {
                let Some((entry, person)) = self.player(*id) else {
                    tracing::debug!(id, "batter missing from players map");
                    return None;
                };
                let stats = &entry.stats.batting;
                let position = entry
                    .position
                    .as_ref()
                    .and_then(|p| p.abbreviation.clone())
                    .unwrap_or_default();
                let at_bats = stats.at_bats.unwrap_or(0);
                if position == "P" && at_bats == 0 {
                    return None;
                }
                Some(BattingLine {
                    person_id: person.id,
                    name: person.full_name.clone(),
                    position,
                    headshot_url: headshot_url(Some(person.id)),
                    at_bats,
                    runs: stats.runs.unwrap_or(0),
                    hits: stats.hits.unwrap_or(0),
                    rbi: stats.rbi.unwrap_or(0),
                    walks: stats.base_on_balls.unwrap_or(0),
                    strikeouts: stats.strike_outs.unwrap_or(0),
                    avg: entry
                        .season_stats
                        .batting
                        .avg
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AVG.to_string()),
                })
            })
            .collect()
    }

    pub fn pitching_lines(&self) -> Vec<PitchingLine> {
        self.pitchers
            .iter()
            .filter_map(|id| {
                let (entry, person) = self.player(*id)?;
                let stats = &entry.stats.pitching;
                Some(PitchingLine {
                    person_id: person.id,
                    name: person.full_name.clone(),
                    headshot_url: headshot_url(Some(person.id)),
                    innings_pitched: stats
                        .innings_pitched
                        .clone()
                        .unwrap_or_else(|| DEFAULT_IP.to_string()),
                    hits: stats.hits.unwrap_or(0),
                    runs: stats.runs.unwrap_or(0),
                    earned_runs: stats.earned_runs.unwrap_or(0),
                    walks: stats.base_on_balls.unwrap_or(0),
                    strikeouts: stats.strike_outs.unwrap_or(0),
                    era: entry
                        .season_stats
                        .pitching
                        .era
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ERA.to_string()),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_JSON: &str = r#"{
        "batters": [1, 2, 3, 99],
        "pitchers": [3, 4],
        "players": {
            "ID1": {
                "person": {"id": 1, "fullName": "Lead Off"},
                "position": {"abbreviation": "CF"},
                "stats": {"batting": {"atBats": 4, "runs": 1, "hits": 2, "rbi": 1, "baseOnBalls": 0, "strikeOuts": 1}},
                "seasonStats": {"batting": {"avg": ".301"}}
            },
            "ID2": {
                "person": {"id": 2, "fullName": "No Stats"},
                "position": {"abbreviation": "DH"}
            },
            "ID3": {
                "person": {"id": 3, "fullName": "Starter Arm"},
                "position": {"abbreviation": "P"},
                "stats": {"batting": {"atBats": 0}, "pitching": {"inningsPitched": "6.1", "hits": 5, "runs": 2, "earnedRuns": 2, "baseOnBalls": 1, "strikeOuts": 7}},
                "seasonStats": {"pitching": {"era": "3.12"}}
            },
            "ID4": {
                "person": {"id": 4, "fullName": "Relief Arm"},
                "position": {"abbreviation": "P"}
            }
        }
    }"#;

    fn team() -> TeamBoxscore {
        serde_json::from_str(TEAM_JSON).expect("team json should parse")
    }

    #[test]
    fn batting_skips_hitless_pitchers_and_unknown_ids() {
        let lines = team().batting_lines();
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Lead Off", "No Stats"]);
        assert_eq!(lines[0].avg, ".301");
        assert_eq!(lines[0].hits, 2);
    }

    #[test]
    fn batting_defaults_missing_stats() {
        let lines = team().batting_lines();
        let empty = &lines[1];
        assert_eq!(empty.at_bats, 0);
        assert_eq!(empty.avg, ".000");
        assert_eq!(empty.cells()[0], "No Stats DH");
    }

    #[test]
    fn pitching_keeps_order_and_defaults() {
        let lines = team().pitching_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].innings_pitched, "6.1");
        assert_eq!(lines[0].era, "3.12");
        assert_eq!(lines[1].innings_pitched, "0.0");
        assert_eq!(lines[1].era, "0.00");
        assert_eq!(lines[1].cells().len(), PITCHING_COLUMNS.len());
    }
}
