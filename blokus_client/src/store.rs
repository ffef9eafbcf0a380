use std::sync::Arc;

use blokus::GameState;
use tokio::sync::watch;

/// Shared handle to the state of the current game.
///
/// Every change is a whole new [`GameState`] derived from the previous one,
/// and is broadcast to all receivers returned by [`Store::subscribe`].
/// Cloning the store gives another handle to the same state.
#[derive(Clone, Debug)]
pub struct Store {
    sender: Arc<watch::Sender<Option<GameState>>>,
}

impl Store {
    /// A store without a game.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// A copy of the current state, `None` if no game has been started.
    pub fn snapshot(&self) -> Option<GameState> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<GameState>> {
        self.sender.subscribe()
    }

    /// Replaces the state, e.g. when a new game starts.
    pub fn replace(&self, state: GameState) {
        self.sender.send_replace(Some(state));
    }

    /// Puts back a state taken with [`Store::snapshot`], with or without a game.
    pub fn restore(&self, state: Option<GameState>) {
        self.sender.send_replace(state);
    }

    /// Derives the next state from the current one.
    ///
    /// Returns the new state if it differs from the previous one. Does
    /// nothing and returns `None` if no game has been started. Concurrent
    /// updates are applied one after the other.
    pub fn update(&self, f: impl FnOnce(&GameState) -> GameState) -> Option<GameState> {
        let mut updated = None;
        self.sender.send_if_modified(|slot| {
            let Some(prev) = slot.as_ref() else {
                return false;
            };
            let next = f(prev);
            if next == *prev {
                return false;
            }
            updated = Some(next.clone());
            *slot = Some(next);
            true
        });
        updated
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use blokus::{PlayerColor, PIECES};

    use super::*;

    #[test]
    fn update_without_game_does_nothing() {
        let store = Store::new();
        assert!(store.update(|s| s.with_selected_piece(Some(1))).is_none());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn subscribers_see_changes() {
        let store = Store::new();
        let mut rx = store.subscribe();
        store.replace(GameState::new(&PIECES, PlayerColor::First));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        let updated = store.update(|s| s.with_selected_piece(Some(3))).unwrap();
        assert_eq!(updated.selected_piece, Some(3));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().selected_piece, Some(3));

        // Unchanged states are not broadcast
        assert!(store.update(|s| s.clone()).is_none());
        assert!(!rx.has_changed().unwrap());
    }
}
