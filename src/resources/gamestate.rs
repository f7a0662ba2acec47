//! High-level game state resources.
//!
//! [`GameState`] is the authoritative screen the game is on; screens request
//! a change through [`NextGameState`] and the game loop applies it at the end
//! of the frame, running the new screen's `enter` hook (see
//! [`crate::game::Game::update`]).

/// Discrete high-level states the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    Menu,
    LevelSelect,
    Playing,
    Win,
    Fail,
    Exit,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    pub fn new(initial: GameStates) -> Self {
        GameState { current: initial }
    }
    /// Read-only access to the current state.
    pub fn get(&self) -> GameStates {
        self.current
    }
    /// Update the current state immediately, without running enter hooks.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }
}

/// Intent to change to a new game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        NextGameState {
            next: NextGameStates::Unchanged,
        }
    }

    /// Get the current transition request.
    pub fn get(&self) -> NextGameStates {
        self.next
    }

    /// Request a transition to `next`. The last request of a frame wins.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    /// Take the pending request, leaving [`NextGameStates::Unchanged`].
    pub fn take(&mut self) -> Option<GameStates> {
        match std::mem::take(&mut self.next) {
            NextGameStates::Pending(state) => Some(state),
            NextGameStates::Unchanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_pending_request() {
        let mut next = NextGameState::new();
        assert_eq!(next.take(), None);
        next.set(GameStates::Win);
        next.set(GameStates::Fail);
        assert_eq!(next.get(), NextGameStates::Pending(GameStates::Fail));
        assert_eq!(next.take(), Some(GameStates::Fail));
        assert_eq!(next.get(), NextGameStates::Unchanged);
    }
}
