//! Game plugin
//!
//! Registers the session systems in a fixed order using [`GameSet`]. Network
//! documents are applied in `PreUpdate` so a message is never applied halfway
//! through a frame, and the painter runs in `PostUpdate` on the finished
//! state.

use bevy::prelude::*;
use tracing::debug;

use crate::app_state::{self, AppState};
use crate::catalog::GameData;
use crate::events::{BoardInput, SessionAction};
use crate::network::{self, NetEventRx};
use crate::session::GameSession;
use crate::view;

/// The execution order within `Update` is:
/// 1. **EventProcessing** - pointer input and UI actions become commands
/// 2. **Animation** - one animation tick, then draw metadata catches up
/// 3. **Output** - app state follows the session, commands go out
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    EventProcessing,
    Animation,
    Output,
}

pub fn configure_game_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSet::EventProcessing,
            GameSet::Animation.after(GameSet::EventProcessing),
            GameSet::Output.after(GameSet::Animation),
        ),
    );
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        configure_game_sets(app);

        app.init_resource::<GameData>()
            .add_systems(
                PreUpdate,
                (network::drain_net_events, network::process_net_events)
                    .chain()
                    .run_if(resource_exists::<NetEventRx>),
            )
            .add_systems(
                Update,
                (handle_board_input, handle_session_actions)
                    .chain()
                    .in_set(GameSet::EventProcessing),
            )
            .add_systems(
                Update,
                (advance_frame, prepare_frame)
                    .chain()
                    .in_set(GameSet::Animation),
            )
            .add_systems(
                Update,
                (app_state::follow_session, network::flush_command_outbox)
                    .chain()
                    .in_set(GameSet::Output),
            )
            .add_systems(OnExit(AppState::InGame), app_state::cleanup_ingame_session)
            .add_systems(PostUpdate, view::render_frame);
    }
}

pub fn handle_board_input(mut inputs: MessageReader<BoardInput>, mut session: ResMut<GameSession>) {
    for input in inputs.read() {
        match *input {
            BoardInput::Hover(pixel) => {
                if let Some(loc) = session.hover(pixel) {
                    debug!(%loc, "Hovering tile");
                }
            }
            BoardInput::Click(pixel) => session.click(pixel),
        }
    }
}

pub fn handle_session_actions(
    mut actions: MessageReader<SessionAction>,
    mut session: ResMut<GameSession>,
) {
    for action in actions.read() {
        match action {
            SessionAction::CastSpell(spell) => session.cast_spell(spell),
            SessionAction::UseAbility { caster, ability } => session.use_ability(*caster, ability),
            SessionAction::EndTurn => session.end_turn(),
            SessionAction::ModifyResources { resource, delta } => {
                session.modify_resources(*resource, *delta)
            }
            SessionAction::ModifyDeck(change) => session.modify_deck(change.clone()),
            SessionAction::CreateGame { with_bots } => session.create_game(*with_bots),
            SessionAction::JoinGame => session.join_game(),
            SessionAction::EnterLobby => session.enter_lobby(),
            SessionAction::Resign => session.resign(),
        }
    }
}

pub fn advance_frame(mut session: ResMut<GameSession>) {
    session.frame();
}

pub fn prepare_frame(mut session: ResMut<GameSession>, data: Res<GameData>) {
    session.prepare_frame(&data);
}
