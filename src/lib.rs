pub mod boxscore;
pub mod config;
pub mod content_fetch;
pub mod error;
pub mod feed;
pub mod game;
pub mod game_fetch;
pub mod http_client;
pub mod logging;
pub mod play;
pub mod state;
pub mod video;

pub use error::{GamecastError, GamecastResult};
pub use play::{normalize, DisplayPlay, PlayRecord};
pub use video::{select_best_playback, PlaybackVariant, SelectedPlayback};
