use bevy::prelude::*;
use tracing::info;

use crate::session::GameSession;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Lobby,
    InGame,
}

/// A game is shown exactly while the session holds a board.
pub fn follow_session(
    session: Res<GameSession>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    let wanted = if session.registry().is_loaded() {
        AppState::InGame
    } else {
        AppState::Lobby
    };
    if *state.get() != wanted {
        info!(from = ?state.get(), to = ?wanted, "Changing app state");
        next.set(wanted);
    }
}

pub fn cleanup_ingame_session(mut session: ResMut<GameSession>) {
    session.reset();
}
