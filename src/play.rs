use crate::game::headshot_url;

pub const UNAVAILABLE: &str = "--";

/// Ordered icon table. Evaluated top to bottom; the first row with a pattern
/// contained in the lowercased event type wins, so compound events ("sac fly
/// double play", "grounded into dp") must sit above the plain hits they embed.
pub const EVENT_ICONS: &[(&[&str], &str)] = &[
    (&["home run", "home_run"], "HR"),
    (&["sac fly", "sac_fly"], "SF"),
    (&["sac bunt", "sac_bunt"], "SH"),
    (
        &["grounded into dp", "grounded_into_dp", "grounded_into_double_play"],
        "GIDP",
    ),
    (&["triple play", "triple_play"], "TP"),
    (&["double play", "double_play"], "DP"),
    (&["triple"], "3B"),
    (&["double"], "2B"),
    (&["single"], "1B"),
    (&["walk"], "BB"),
    (&["hit by pitch", "hit_by_pitch"], "HBP"),
    (&["field error", "field_error"], "E"),
    (&["fielders choice", "fielders_choice"], "FC"),
    (&["catcher interference", "catcher_interf"], "CI"),
    (&["strikeout"], "K"),
    (&["forceout", "force_out"], "FC"),
    (&["groundout"], "GO"),
    (&["flyout"], "FO"),
    (&["lineout"], "LO"),
    (&["pop out", "pop_out"], "PO"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfInning {
    Top,
    Bottom,
}

impl HalfInning {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "1B" => Some(Self::First),
            "2B" => Some(Self::Second),
            "3B" => Some(Self::Third),
            _ => None,
        }
    }
}

/// Where a runner finished a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEnd {
    Base(Base),
    Scored,
}

impl RunnerEnd {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("score") {
            return Some(Self::Scored);
        }
        Base::parse(raw).map(Self::Base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunnerMovement {
    pub start: Option<Base>,
    pub end: Option<RunnerEnd>,
}

impl RunnerMovement {
    pub fn touches(&self, base: Base) -> bool {
        self.start == Some(base) || self.end == Some(RunnerEnd::Base(base))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
    pub outs: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseOccupancy {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl BaseOccupancy {
    pub fn is_empty(&self) -> bool {
        !(self.first || self.second || self.third)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BattedBallMetrics {
    pub exit_velocity_mph: Option<f64>,
    pub launch_angle_deg: Option<f64>,
    pub distance_ft: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMetrics {
    pub exit_velocity: String,
    pub launch_angle: String,
    pub distance: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub inning: u8,
    pub half_inning: HalfInning,
    pub batting_player_id: Option<u32>,
    pub batter_name: Option<String>,
    pub event: String,
    pub event_type: String,
    pub event_description: String,
    pub count: Count,
    pub runners: Vec<RunnerMovement>,
    pub batted_ball_metrics: Option<BattedBallMetrics>,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub rbi: Option<u8>,
    pub play_id: Option<String>,
}

/// Display-ready form of a play. Derived fresh each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPlay {
    pub inning_label: String,
    pub batter_name: String,
    pub headshot_url: String,
    pub event_icon: String,
    pub event: String,
    pub description: String,
    pub count_label: String,
    pub outs: u8,
    pub bases: BaseOccupancy,
    pub metrics: FormattedMetrics,
    pub score_label: Option<String>,
    pub rbi: u8,
    pub play_id: Option<String>,
}

pub fn normalize(play: &PlayRecord) -> DisplayPlay {
    let score_label = match (play.home_score, play.away_score) {
        (Some(home), Some(away)) => Some(format!("{home} - {away}")),
        _ => None,
    };

    DisplayPlay {
        inning_label: format!("{} {}", play.half_inning.label(), play.inning),
        batter_name: play.batter_name.clone().unwrap_or_default(),
        headshot_url: headshot_url(play.batting_player_id),
        event_icon: match_event_icon(&play.event_type),
        event: play.event.clone(),
        description: play.event_description.clone(),
        count_label: format!("{}-{}", play.count.balls, play.count.strikes),
        outs: play.count.outs,
        bases: derive_base_occupancy(&play.runners),
        metrics: format_batted_ball_metrics(play.batted_ball_metrics.as_ref()),
        score_label,
        rbi: play.rbi.unwrap_or(0),
        play_id: play.play_id.clone(),
    }
}

pub fn match_event_icon(event_type: &str) -> String {
    if event_type.is_empty() {
        return String::new();
    }
    let lowered = event_type.to_lowercase();
    EVENT_ICONS
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lowered.contains(p)))
        .map(|(_, icon)| (*icon).to_string())
        .unwrap_or_else(|| event_type.chars().take(3).collect::<String>().to_uppercase())
}

// Presence check: a runner who started on a base marks it even if they moved on.
pub fn derive_base_occupancy(runners: &[RunnerMovement]) -> BaseOccupancy {
    BaseOccupancy {
        first: runners.iter().any(|r| r.touches(Base::First)),
        second: runners.iter().any(|r| r.touches(Base::Second)),
        third: runners.iter().any(|r| r.touches(Base::Third)),
    }
}

/// Rounds to `places` decimals with ties going toward positive infinity, so
/// 95.25 and 101.75 both round up and -2.5 becomes -2.
fn round_half_up(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale + 0.5).floor() / scale
}

pub fn format_batted_ball_metrics(metrics: Option<&BattedBallMetrics>) -> FormattedMetrics {
    let metrics = metrics.copied().unwrap_or_default();
    FormattedMetrics {
        exit_velocity: metrics
            .exit_velocity_mph
            .map(|v| format!("{:.1} MPH", round_half_up(v, 1)))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        launch_angle: metrics
            .launch_angle_deg
            .map(|v| format!("{}°", round_half_up(v, 0) as i64))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        distance: metrics
            .distance_ft
            .map(|v| format!("{v} ft"))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
    }
}
