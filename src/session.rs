use bevy::prelude::Resource;
use packets::client::{Commands, DeckChoice};
use packets::server::{
    AttackAnim, ChooseAbility, DeathAnim, GameSnapshot, IllegalCast, Lobby, MoveAnim, PlayerInfo,
    SelectUnitMove, ServerMessage,
};
use packets::types::Loc;
use packets::{Element, ToElement};
use tracing::{debug, info};

use crate::avatar::{ATTACK_TICKS, AvatarStore, DEATH_TICKS};
use crate::catalog::GameData;
use crate::draw_map::DrawMap;
use crate::gate::UpdateGate;
use crate::hex::STEP_TICKS;
use crate::registry::EntityRegistry;
use crate::scheduler::FrameClock;

/// What the local player is in the middle of casting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Casting {
    Spell(String),
    /// `spell` is `<unit type>.<ability id>`.
    Ability { caster: u32, spell: String },
}

/// Pending choices the local player is being asked to make.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub casting: Option<Casting>,
    /// Targets picked so far for the current cast.
    pub targets: Vec<Loc>,
    pub legal_targets: Option<Vec<Loc>>,
    pub unit_move: Option<SelectUnitMove>,
    /// Unit whose abilities were last offered.
    pub ability_unit: Option<u32>,
}

impl Selection {
    pub fn cancel_casting(&mut self) {
        self.casting = None;
        self.targets.clear();
        self.legal_targets = None;
    }

    /// Tiles to light up: legal targets plus move destinations.
    pub fn highlighted(&self) -> Vec<Loc> {
        let targets = self.legal_targets.iter().flatten().copied();
        let routes = self
            .unit_move
            .iter()
            .flat_map(|m| m.routes.iter().map(|r| r.dest));
        targets.chain(routes).collect()
    }
}

/// Everything the client knows about the game in progress, owned by the app
/// and handed to systems by reference.
#[derive(Resource)]
pub struct GameSession {
    pub(crate) user_id: String,
    pub(crate) deck: DeckChoice,
    pub(crate) registry: EntityRegistry,
    pub(crate) avatars: AvatarStore,
    pub(crate) gate: UpdateGate<ServerMessage>,
    pub(crate) clock: FrameClock,
    pub(crate) draw_map: Option<DrawMap>,
    /// The map still fits the board but towers or avatars may have moved.
    pub(crate) draw_map_stale: bool,
    pub(crate) selection: Selection,
    pub(crate) hover: Option<Loc>,
    pub(crate) lobby: Option<Lobby>,
    pub(crate) player_info: Option<PlayerInfo>,
    /// Players who joined the game we created.
    pub(crate) signups: u32,
    pub(crate) outbox: Vec<Element>,
}

impl GameSession {
    pub fn new(user_id: impl Into<String>, deck: DeckChoice) -> Self {
        GameSession {
            user_id: user_id.into(),
            deck,
            registry: EntityRegistry::default(),
            avatars: AvatarStore::default(),
            gate: UpdateGate::default(),
            clock: FrameClock::default(),
            draw_map: None,
            draw_map_stale: false,
            selection: Selection::default(),
            hover: None,
            lobby: None,
            player_info: None,
            signups: 0,
            outbox: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn avatars(&self) -> &AvatarStore {
        &self.avatars
    }

    pub fn draw_map(&self) -> Option<&DrawMap> {
        self.draw_map.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hovered(&self) -> Option<Loc> {
        self.hover
    }

    pub fn lobby(&self) -> Option<&Lobby> {
        self.lobby.as_ref()
    }

    pub fn player_info(&self) -> Option<&PlayerInfo> {
        self.player_info.as_ref()
    }

    pub fn frame_number(&self) -> u32 {
        self.clock.frame()
    }

    pub fn highlight_alpha(&self) -> f32 {
        self.clock.highlight_alpha()
    }

    /// Frames left before held messages are applied.
    pub fn animation_budget(&self) -> u32 {
        self.gate.budget()
    }

    pub fn pending_messages(&self) -> usize {
        self.gate.pending()
    }

    /// Applies a server message now, or holds it while an animation plays.
    pub fn submit(&mut self, message: ServerMessage) {
        match self.gate.submit(message) {
            Some(message) => self.apply(message),
            None => debug!(pending = self.gate.pending(), "Holding message until animation ends"),
        }
    }

    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Game(snapshot) => self.apply_game(*snapshot),
            ServerMessage::MoveAnim(anim) => self.apply_move(anim),
            ServerMessage::AttackAnim(anim) => self.apply_attack(anim),
            ServerMessage::DeathAnim(anim) => self.apply_death(anim),
            ServerMessage::SelectUnitMove(info) => {
                self.selection.unit_move = Some(info);
                self.refresh_highlights();
            }
            ServerMessage::ChooseAbility(choice) => self.apply_choose_ability(choice),
            ServerMessage::IllegalCast(cast) => self.apply_illegal_cast(cast),
            ServerMessage::Lobby(lobby) => {
                if self.registry.is_loaded() {
                    debug!("Ignoring lobby listing during a game");
                } else {
                    self.lobby = Some(lobby);
                }
            }
            ServerMessage::PlayerInfo(player_info) => {
                if self.registry.is_loaded() {
                    debug!("Ignoring player info during a game");
                } else {
                    self.player_info = Some(player_info);
                }
            }
            ServerMessage::GameCreated => self.signup(false),
            ServerMessage::JoinGame => self.signup(true),
            ServerMessage::DebugMessage(msg) => info!(%msg, "Server debug message"),
            ServerMessage::Unrecognized(tag) => debug!(%tag, "Ignoring unrecognized message"),
        }
    }

    /// One animation frame: advance the clock, spend budget, release held
    /// messages once it runs out, then move every avatar a tick.
    pub fn frame(&mut self) {
        self.clock.advance();

        if self.gate.countdown() {
            while let Some(message) = self.gate.pop_ready() {
                self.apply(message);
            }
        }

        let before = self.avatars.len();
        self.avatars
            .advance_all(&self.registry, self.draw_map.as_ref());
        if self.avatars.len() != before {
            self.reindex_avatars();
        }
    }

    /// Builds draw metadata once terrain is available and resolves sprites
    /// that finished loading.
    pub fn prepare_frame(&mut self, data: &GameData) {
        if (self.draw_map.is_none() || self.draw_map_stale) && self.registry.is_loaded() {
            self.draw_map_stale = false;
            self.draw_map = DrawMap::build(&self.registry, data, &self.avatars);
            if self.draw_map.is_some() {
                debug!("Board draw metadata built");
                self.refresh_highlights();
            }
        }
        self.avatars.cache_sprites(&self.registry, data);
    }

    /// Leaves the current game. Nothing in flight is allowed to finish.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.avatars.clear();
        self.gate.clear();
        self.draw_map = None;
        self.draw_map_stale = false;
        self.selection = Selection::default();
        self.hover = None;
    }

    pub fn take_commands(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn queue<T: ToElement>(&mut self, command: &T) {
        self.outbox.push(command.to_element());
    }

    pub(crate) fn refresh_highlights(&mut self) {
        let lit = self.selection.highlighted();
        if let Some(map) = &mut self.draw_map {
            map.set_highlights(&lit);
        }
    }

    fn reindex_avatars(&mut self) {
        if let Some(map) = &mut self.draw_map {
            map.reindex_avatars(&self.registry, &self.avatars);
        }
    }

    fn clear_ability_choice(&mut self) {
        if self.selection.ability_unit.take().is_some() {
            self.registry.clear_usable_abilities();
        }
    }

    fn apply_game(&mut self, snapshot: GameSnapshot) {
        self.selection.cancel_casting();
        self.clear_ability_choice();

        // Terrain offsets stay valid while the board is the same, so motions
        // started before the next rebuild keep their footing.
        let same_board = self
            .registry
            .board()
            .is_some_and(|b| b.width == snapshot.width && b.tiles == snapshot.tiles);

        let retired = self.registry.replace(snapshot, &self.user_id);
        self.avatars.sync(self.registry.units(), retired);
        if same_board {
            self.draw_map_stale = true;
            self.reindex_avatars();
        } else {
            self.draw_map = None;
        }

        debug!(
            units = self.registry.units().len(),
            side = ?self.registry.player_side(),
            "Game state replaced"
        );
    }

    fn apply_move(&mut self, anim: MoveAnim) {
        // Ten ticks per path segment: the length of the walk.
        let segments = anim.steps.len().saturating_sub(1) as u32;
        self.gate.raise_budget(segments * STEP_TICKS);

        let Some(key) = self.avatars.find_at(anim.from, &self.registry) else {
            debug!(from = %anim.from, "No unit to move");
            return;
        };
        self.registry.set_unit_location(key, anim.to);
        self.avatars
            .start_walk(key, anim.steps, self.draw_map.as_ref());
        self.reindex_avatars();
    }

    fn apply_attack(&mut self, anim: AttackAnim) {
        self.clear_ability_choice();
        self.gate.raise_budget(ATTACK_TICKS);

        let Some(key) = self.avatars.find_at(anim.from, &self.registry) else {
            debug!(from = %anim.from, "No unit to attack with");
            return;
        };
        self.avatars
            .start_attack(key, anim.to, &self.registry, self.draw_map.as_ref());
    }

    fn apply_death(&mut self, anim: DeathAnim) {
        let Some(key) = self.avatars.find_at(anim.loc, &self.registry) else {
            debug!(loc = %anim.loc, "No unit to kill");
            return;
        };
        self.avatars.start_dying(key);
        self.gate.raise_budget(DEATH_TICKS);
    }

    fn apply_choose_ability(&mut self, choice: ChooseAbility) {
        self.clear_ability_choice();
        if self.registry.mark_usable_abilities(choice.unit, &choice.abilities) {
            self.selection.ability_unit = Some(choice.unit);
        } else {
            debug!(unit = choice.unit, "Abilities offered for unknown unit");
        }
    }

    fn apply_illegal_cast(&mut self, cast: IllegalCast) {
        if cast.legal_targets.is_empty() {
            debug!("Cast has no legal targets");
            self.selection.cancel_casting();
        } else {
            self.selection.legal_targets = Some(cast.legal_targets);
        }
        self.refresh_highlights();
    }

    fn signup(&mut self, joined: bool) {
        if joined {
            self.signups += 1;
            info!(signups = self.signups, "Player joined game");
        }
        if self.signups >= 1 {
            let setup = Commands::setup(&self.deck);
            self.queue(&setup);
        }
    }
}
