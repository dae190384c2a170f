use crate::boxscore::TeamBoxscore;
use crate::play::{self, BaseOccupancy, Count, DisplayPlay, PlayRecord};

const TEAM_LOGO_BASE: &str = "https://www.mlbstatic.com/team-logos";
const HEADSHOT_BASE: &str = "https://midfield.mlbstatic.com/v1/people";
pub const GENERIC_HEADSHOT_URL: &str = "https://img.mlbstatic.com/mlb-photos/image/upload/d_people:generic:headshot:67:current.png/w_60,q_auto:best/v1/people/generic/headshot/67/current.png";

const FINAL_STATES: &[&str] = &["Final", "Game Over", "Completed Early"];
const PREGAME_STATES: &[&str] = &["Pre-Game", "Scheduled"];
// The scorebug also hides on a tie, which the phase check does not treat as final.
const SCOREBUG_HIDDEN_STATES: &[&str] = &["Final", "Game Over", "Final: Tied", "Completed Early"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Pregame,
    Live,
    Final,
}

impl GamePhase {
    pub fn from_status(detailed_state: &str) -> Self {
        if FINAL_STATES.contains(&detailed_state) {
            Self::Final
        } else if PREGAME_STATES.contains(&detailed_state) {
            Self::Pregame
        } else {
            Self::Live
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pregame => "PREGAME",
            Self::Live => "LIVE",
            Self::Final => "FINAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label for the switch control: names the theme it would switch to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark",
            Self::Dark => "Light",
        }
    }
}

pub fn team_logo_url(team_id: u32, theme: Theme) -> String {
    match theme {
        Theme::Light => format!("{TEAM_LOGO_BASE}/{team_id}.svg"),
        Theme::Dark => format!("{TEAM_LOGO_BASE}/team-cap-on-dark/{team_id}.svg"),
    }
}

pub fn headshot_url(person_id: Option<u32>) -> String {
    match person_id {
        Some(id) => format!("{HEADSHOT_BASE}/{id}/spots/60"),
        None => GENERIC_HEADSHOT_URL.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamInfo {
    pub id: u32,
    pub name: String,
    pub abbreviation: String,
    pub record: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamTotals {
    pub runs: Option<u16>,
    pub hits: Option<u16>,
    pub errors: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InningLine {
    pub num: u8,
    pub away_runs: Option<u8>,
    pub home_runs: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Linescore {
    pub innings: Vec<InningLine>,
    pub away: TeamTotals,
    pub home: TeamTotals,
    pub offense: BaseOccupancy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinescoreRow {
    pub abbreviation: String,
    pub innings: Vec<String>,
    pub runs: String,
    pub hits: String,
    pub errors: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorebug {
    pub count: Count,
    pub bases: BaseOccupancy,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameFeed {
    pub game_pk: Option<u64>,
    pub status: String,
    pub away: TeamInfo,
    pub home: TeamInfo,
    pub linescore: Option<Linescore>,
    pub plays: Vec<PlayRecord>,
    pub scoring_plays: Vec<usize>,
    pub current_count: Option<Count>,
    pub away_boxscore: Option<TeamBoxscore>,
    pub home_boxscore: Option<TeamBoxscore>,
}

impl GameFeed {
    pub fn phase(&self) -> GamePhase {
        GamePhase::from_status(&self.status)
    }

    pub fn highlights_available(&self) -> bool {
        self.phase() == GamePhase::Final
    }

    /// Count and runners for the at-bat in progress. Absent once the game is
    /// over or when the feed has no current play yet.
    pub fn scorebug(&self) -> Option<Scorebug> {
        if self.phase() != GamePhase::Live || SCOREBUG_HIDDEN_STATES.contains(&self.status.as_str())
        {
            return None;
        }
        let count = self.current_count?;
        let bases = self
            .linescore
            .as_ref()
            .map(|l| l.offense)
            .unwrap_or_default();
        Some(Scorebug { count, bases })
    }

    pub fn linescore_rows(&self) -> Vec<LinescoreRow> {
        let Some(linescore) = self.linescore.as_ref() else {
            return Vec::new();
        };
        if linescore.innings.is_empty() {
            return Vec::new();
        }
        let cell = |v: Option<u16>| v.map(|n| n.to_string()).unwrap_or_default();
        let row = |team: &TeamInfo, totals: &TeamTotals, pick: fn(&InningLine) -> Option<u8>| {
            LinescoreRow {
                abbreviation: team.abbreviation.clone(),
                innings: linescore
                    .innings
                    .iter()
                    .map(|i| pick(i).map(|r| r.to_string()).unwrap_or_default())
                    .collect(),
                runs: cell(totals.runs),
                hits: cell(totals.hits),
                errors: cell(totals.errors),
            }
        };
        vec![
            row(&self.away, &linescore.away, |i| i.away_runs),
            row(&self.home, &linescore.home, |i| i.home_runs),
        ]
    }

    pub fn display_plays(&self) -> Vec<DisplayPlay> {
        self.plays.iter().map(play::normalize).collect()
    }

    pub fn scoring_display_plays(&self) -> Vec<DisplayPlay> {
        self.scoring_plays
            .iter()
            .filter_map(|idx| self.plays.get(*idx))
            .map(play::normalize)
            .collect()
    }

    pub fn team_boxscore(&self, side: BoxscoreSide) -> (&TeamInfo, Option<&TeamBoxscore>) {
        match side {
            BoxscoreSide::Away => (&self.away, self.away_boxscore.as_ref()),
            BoxscoreSide::Home => (&self.home, self.home_boxscore.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxscoreSide {
    #[default]
    Away,
    Home,
}

impl BoxscoreSide {
    pub fn label(self) -> &'static str {
        match self {
            Self::Away => "away",
            Self::Home => "home",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_with_status(status: &str) -> GameFeed {
        GameFeed {
            status: status.to_string(),
            away: TeamInfo {
                id: 147,
                name: "New York Yankees".to_string(),
                abbreviation: "NYY".to_string(),
                record: Some("50-30".to_string()),
            },
            home: TeamInfo {
                id: 111,
                name: "Boston Red Sox".to_string(),
                abbreviation: "BOS".to_string(),
                record: None,
            },
            linescore: Some(Linescore {
                innings: vec![
                    InningLine {
                        num: 1,
                        away_runs: Some(0),
                        home_runs: Some(2),
                    },
                    InningLine {
                        num: 2,
                        away_runs: Some(1),
                        home_runs: None,
                    },
                ],
                away: TeamTotals {
                    runs: Some(1),
                    hits: Some(4),
                    errors: Some(0),
                },
                home: TeamTotals {
                    runs: Some(2),
                    hits: Some(3),
                    errors: None,
                },
                offense: BaseOccupancy {
                    first: true,
                    second: false,
                    third: true,
                },
            }),
            current_count: Some(Count {
                balls: 3,
                strikes: 2,
                outs: 2,
            }),
            ..GameFeed::default()
        }
    }

    #[test]
    fn phase_follows_detailed_state() {
        assert_eq!(GamePhase::from_status("Final"), GamePhase::Final);
        assert_eq!(GamePhase::from_status("Game Over"), GamePhase::Final);
        assert_eq!(GamePhase::from_status("Scheduled"), GamePhase::Pregame);
        assert_eq!(GamePhase::from_status("In Progress"), GamePhase::Live);
        assert_eq!(GamePhase::from_status("Final: Tied"), GamePhase::Live);
    }

    #[test]
    fn scorebug_only_while_live() {
        let live = feed_with_status("In Progress");
        let bug = live.scorebug().expect("live game has a scorebug");
        assert_eq!(bug.count.balls, 3);
        assert_eq!(bug.count.outs, 2);
        assert!(bug.bases.first && bug.bases.third && !bug.bases.second);

        assert!(feed_with_status("Final").scorebug().is_none());
        assert!(feed_with_status("Final: Tied").scorebug().is_none());
        assert!(feed_with_status("Pre-Game").scorebug().is_none());
    }

    #[test]
    fn scorebug_needs_current_play() {
        let mut feed = feed_with_status("In Progress");
        feed.current_count = None;
        assert!(feed.scorebug().is_none());
    }

    #[test]
    fn linescore_rows_blank_missing_cells() {
        let rows = feed_with_status("In Progress").linescore_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].abbreviation, "NYY");
        assert_eq!(rows[0].innings, vec!["0", "1"]);
        assert_eq!(rows[1].innings, vec!["2", ""]);
        assert_eq!(rows[1].errors, "");
        assert_eq!(rows[0].hits, "4");
    }

    #[test]
    fn highlights_only_after_final() {
        assert!(feed_with_status("Final").highlights_available());
        assert!(!feed_with_status("In Progress").highlights_available());
    }

    #[test]
    fn logo_urls_follow_theme() {
        assert_eq!(
            team_logo_url(147, Theme::Light),
            "https://www.mlbstatic.com/team-logos/147.svg"
        );
        assert_eq!(
            team_logo_url(147, Theme::Dark),
            "https://www.mlbstatic.com/team-logos/team-cap-on-dark/147.svg"
        );
    }

    #[test]
    fn theme_toggle_round_trips_labels() {
        let theme = Theme::default();
        assert_eq!(theme, Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.toggle().toggle_label(), "Light");
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
    }

    #[test]
    fn headshot_falls_back_to_generic() {
        assert_eq!(headshot_url(None), GENERIC_HEADSHOT_URL);
        assert!(headshot_url(Some(5)).ends_with("/5/spots/60"));
    }
}
