use std::collections::VecDeque;

use chrono::Local;

use crate::game::{BoxscoreSide, GameFeed, GamePhase, Theme};
use crate::video::{select_highlights, HighlightItem, HighlightRow};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    AllPlays,
    ScoringPlays,
    Boxscore,
    Highlights,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::AllPlays,
        Tab::ScoringPlays,
        Tab::Boxscore,
        Tab::Highlights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::AllPlays => "All Plays",
            Tab::ScoringPlays => "Scoring Plays",
            Tab::Boxscore => "Boxscore",
            Tab::Highlights => "Highlights",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

#[derive(Debug)]
pub enum Delta {
    SetGame(Box<GameFeed>),
    SetHighlights(Vec<HighlightItem>),
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
}

#[derive(Debug)]
pub struct AppState {
    pub game: Option<GameFeed>,
    pub highlights: Vec<HighlightRow>,
    pub theme: Theme,
    pub tab: Tab,
    pub boxscore_side: BoxscoreSide,
    pub help_overlay: bool,
    pub last_updated: Option<String>,
    pub logs: VecDeque<String>,
    scroll: [u16; 4],
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            game: None,
            highlights: Vec::new(),
            theme,
            tab: Tab::default(),
            boxscore_side: BoxscoreSide::default(),
            help_overlay: false,
            last_updated: None,
            logs: VecDeque::new(),
            scroll: [0; 4],
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.game.as_ref().map(GameFeed::phase)
    }

    /// Highlights only make sense once the game is over.
    pub fn visible_tabs(&self) -> Vec<Tab> {
        let final_game = self.game.as_ref().is_some_and(GameFeed::highlights_available);
        Tab::ALL
            .into_iter()
            .filter(|t| *t != Tab::Highlights || final_game)
            .collect()
    }

    pub fn set_tab(&mut self, tab: Tab) {
        if self.visible_tabs().contains(&tab) {
            self.tab = tab;
        } else {
            self.push_log(format!("[INFO] {} not available yet", tab.label()));
        }
    }

    pub fn cycle_tab(&mut self) {
        let tabs = self.visible_tabs();
        let pos = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = tabs[(pos + 1) % tabs.len()];
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn set_boxscore_side(&mut self, side: BoxscoreSide) {
        self.boxscore_side = side;
        if self.tab == Tab::Boxscore {
            self.scroll[Tab::Boxscore.index()] = 0;
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll[self.tab.index()]
    }

    pub fn scroll_down(&mut self) {
        let slot = &mut self.scroll[self.tab.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        let slot = &mut self.scroll[self.tab.index()];
        *slot = slot.saturating_sub(1);
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetGame(feed) => {
            let prev_phase = state.phase();
            let phase = feed.phase();
            if prev_phase.is_some_and(|p| p != phase) {
                state.push_log(format!("[INFO] Game is now {}", phase.label()));
            }
            state.game = Some(*feed);
            if !state.visible_tabs().contains(&state.tab) {
                state.tab = Tab::AllPlays;
            }
            state.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
        }
        Delta::SetHighlights(items) => {
            state.highlights = select_highlights(&items);
            let playable = state
                .highlights
                .iter()
                .filter(|h| h.playback.is_some())
                .count();
            state.push_log(format!(
                "[INFO] {} highlights ({} playable)",
                state.highlights.len(),
                playable
            ));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(status: &str) -> Box<GameFeed> {
        Box::new(GameFeed {
            status: status.to_string(),
            ..GameFeed::default()
        })
    }

    #[test]
    fn highlights_tab_hidden_until_final() {
        let mut state = AppState::new(Theme::Light);
        apply_delta(&mut state, Delta::SetGame(feed("In Progress")));
        assert!(!state.visible_tabs().contains(&Tab::Highlights));
        state.set_tab(Tab::Highlights);
        assert_eq!(state.tab, Tab::AllPlays);

        apply_delta(&mut state, Delta::SetGame(feed("Final")));
        state.set_tab(Tab::Highlights);
        assert_eq!(state.tab, Tab::Highlights);
    }

    #[test]
    fn cycle_wraps_over_visible_tabs() {
        let mut state = AppState::new(Theme::Light);
        apply_delta(&mut state, Delta::SetGame(feed("In Progress")));
        state.set_tab(Tab::Boxscore);
        state.cycle_tab();
        assert_eq!(state.tab, Tab::AllPlays);
    }

    #[test]
    fn phase_change_is_logged() {
        let mut state = AppState::new(Theme::Dark);
        apply_delta(&mut state, Delta::SetGame(feed("Pre-Game")));
        assert!(state.logs.is_empty());
        apply_delta(&mut state, Delta::SetGame(feed("In Progress")));
        assert!(state.logs.back().is_some_and(|l| l.ends_with("Game is now LIVE")));
    }

    #[test]
    fn scroll_is_tracked_per_tab() {
        let mut state = AppState::new(Theme::Light);
        state.scroll_down();
        state.scroll_down();
        state.tab = Tab::Boxscore;
        assert_eq!(state.scroll(), 0);
        state.scroll_up();
        assert_eq!(state.scroll(), 0);
        state.tab = Tab::AllPlays;
        assert_eq!(state.scroll(), 2);
    }

    #[test]
    fn log_ring_is_bounded() {
        let mut state = AppState::new(Theme::Light);
        for i in 0..(MAX_LOGS + 10) {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert!(state.logs.front().is_some_and(|l| l.ends_with("line 10")));
    }
}
