use bevy::prelude::*;
use glam::IVec2;
use packets::client::ModifyDeck;
use packets::types::Resource as Magic;

/// A response or connection change from the request loop.
#[derive(Message, Debug, Clone)]
pub struct NetEvent(pub network::NetworkEvent);

/// Pointer activity over the board, in board pixels.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardInput {
    Hover(IVec2),
    Click(IVec2),
}

/// Buttons and cards outside the board.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    CastSpell(String),
    UseAbility { caster: u32, ability: String },
    EndTurn,
    ModifyResources { resource: Magic, delta: i32 },
    ModifyDeck(ModifyDeck),
    CreateGame { with_bots: bool },
    JoinGame,
    EnterLobby,
    Resign,
}
