use crate::{Element, TryFromElement};

mod attack_anim;
pub use attack_anim::AttackAnim;

mod choose_ability;
pub use choose_ability::ChooseAbility;

mod death_anim;
pub use death_anim::DeathAnim;

pub mod game;
pub use game::{GameSnapshot, PlayerState, SpellSlot, TowerInfo, UnitAbility, UnitInfo};

mod illegal_cast;
pub use illegal_cast::IllegalCast;

mod lobby;
pub use lobby::{Lobby, LobbyGame};

mod move_anim;
pub use move_anim::MoveAnim;

mod player_info;
pub use player_info::PlayerInfo;

mod select_unit_move;
pub use select_unit_move::{Route, SelectUnitMove};

/// Every document the server can answer with, decoded once at the protocol
/// boundary.
#[derive(Debug, Clone)]
pub enum ServerMessage {
    Game(Box<GameSnapshot>),
    MoveAnim(MoveAnim),
    AttackAnim(AttackAnim),
    DeathAnim(DeathAnim),
    SelectUnitMove(SelectUnitMove),
    ChooseAbility(ChooseAbility),
    IllegalCast(IllegalCast),
    Lobby(Lobby),
    PlayerInfo(PlayerInfo),
    GameCreated,
    JoinGame,
    DebugMessage(String),
    /// A tag this client does not know. Ignored by the session.
    Unrecognized(String),
}

impl ServerMessage {
    pub fn tag(&self) -> &str {
        match self {
            ServerMessage::Game(_) => "game",
            ServerMessage::MoveAnim(_) => "move_anim",
            ServerMessage::AttackAnim(_) => "attack_anim",
            ServerMessage::DeathAnim(_) => "death_anim",
            ServerMessage::SelectUnitMove(_) => "select_unit_move",
            ServerMessage::ChooseAbility(_) => "choose_ability",
            ServerMessage::IllegalCast(_) => "illegal_cast",
            ServerMessage::Lobby(_) => "lobby",
            ServerMessage::PlayerInfo(_) => "player_info",
            ServerMessage::GameCreated => "game_created",
            ServerMessage::JoinGame => "join_game",
            ServerMessage::DebugMessage(_) => "debug_message",
            ServerMessage::Unrecognized(tag) => tag,
        }
    }
}

impl TryFromElement for ServerMessage {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(match el.tag.as_str() {
            "game" => ServerMessage::Game(Box::new(GameSnapshot::try_from_element(el)?)),
            "move_anim" => ServerMessage::MoveAnim(MoveAnim::try_from_element(el)?),
            "attack_anim" => ServerMessage::AttackAnim(AttackAnim::try_from_element(el)?),
            "death_anim" => ServerMessage::DeathAnim(DeathAnim::try_from_element(el)?),
            "select_unit_move" => {
                ServerMessage::SelectUnitMove(SelectUnitMove::try_from_element(el)?)
            }
            "choose_ability" => ServerMessage::ChooseAbility(ChooseAbility::try_from_element(el)?),
            "illegal_cast" => ServerMessage::IllegalCast(IllegalCast::try_from_element(el)?),
            "lobby" => ServerMessage::Lobby(Lobby::try_from_element(el)?),
            "player_info" => ServerMessage::PlayerInfo(PlayerInfo::try_from_element(el)?),
            "game_created" => ServerMessage::GameCreated,
            "join_game" => ServerMessage::JoinGame,
            "debug_message" => {
                ServerMessage::DebugMessage(el.attr("msg").unwrap_or_default().to_string())
            }
            other => ServerMessage::Unrecognized(other.to_string()),
        })
    }
}
