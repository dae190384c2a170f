use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::content_fetch;
use crate::game_fetch;
use crate::state::{Delta, ProviderCommand};

const IDLE_SLEEP: Duration = Duration::from_millis(250);

/// Background poller. One live-feed request per interval; highlights are
/// pulled once the game is final. Exits when either channel closes.
pub fn spawn_provider(
    game_pk: u64,
    interval: Duration,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut poller = Poller {
            game_pk,
            content_loaded: false,
            finished: false,
        };
        let mut last_fetch: Option<Instant> = None;

        loop {
            let mut forced = false;
            loop {
                match cmd_rx.try_recv() {
                    Ok(ProviderCommand::Refresh) => forced = true,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::debug!("command channel closed, provider exiting");
                        return;
                    }
                }
            }

            let due = last_fetch.is_none_or(|t| t.elapsed() >= interval);
            if forced || (due && !poller.finished) {
                if !poller.refresh(&tx, forced) {
                    return;
                }
                last_fetch = Some(Instant::now());
            }

            thread::sleep(IDLE_SLEEP);
        }
    })
}

struct Poller {
    game_pk: u64,
    content_loaded: bool,
    finished: bool,
}

impl Poller {
    /// Returns false once the UI side has hung up.
    fn refresh(&mut self, tx: &Sender<Delta>, forced: bool) -> bool {
        let feed = match game_fetch::fetch_live_feed(self.game_pk) {
            Ok(feed) => feed,
            Err(err) => {
                tracing::warn!(game_pk = self.game_pk, error = %format!("{err:#}"), "live feed fetch failed");
                return tx
                    .send(Delta::Log(format!("[WARN] Live feed error: {err:#}")))
                    .is_ok();
            }
        };

        let highlights_due = feed.highlights_available() && (forced || !self.content_loaded);
        if tx.send(Delta::SetGame(Box::new(feed))).is_err() {
            return false;
        }
        if !highlights_due {
            return true;
        }

        match content_fetch::fetch_game_content(self.game_pk) {
            Ok(items) => {
                self.content_loaded = true;
                self.finished = true;
                tracing::info!(game_pk = self.game_pk, items = items.len(), "highlights loaded");
                tx.send(Delta::SetHighlights(items)).is_ok()
            }
            Err(err) => {
                tracing::warn!(game_pk = self.game_pk, error = %format!("{err:#}"), "game content fetch failed");
                tx.send(Delta::Log(format!("[WARN] Highlights error: {err:#}")))
                    .is_ok()
            }
        }
    }
}
