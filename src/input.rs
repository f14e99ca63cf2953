//! Turns pointer input and UI actions into commands for the server.

use glam::IVec2;
use packets::client::{
    Commands, CreateGame, EndTurn, EnterLobby, ModifyDeck, ModifyResources, MoveUnit, Play,
    SelectUnit,
};
use packets::types::{Loc, Resource};
use tracing::debug;

use crate::hex::pixel_to_loc;
use crate::session::{Casting, GameSession};

impl Casting {
    pub fn play(&self, targets: &[Loc]) -> Play {
        match self {
            Casting::Spell(id) => Play {
                spell: id.clone(),
                caster: None,
                targets: targets.to_vec(),
            },
            Casting::Ability { caster, spell } => Play {
                spell: spell.clone(),
                caster: Some(*caster),
                targets: targets.to_vec(),
            },
        }
    }
}

impl GameSession {
    /// Tracks the tile under the pointer. Returns the new tile when it changed.
    pub fn hover(&mut self, pixel: IVec2) -> Option<Loc> {
        let loc = pixel_to_loc(pixel);
        if self.hover == Some(loc) {
            return None;
        }
        self.hover = Some(loc);
        Some(loc)
    }

    pub fn click(&mut self, pixel: IVec2) {
        if !self.registry.is_loaded() {
            return;
        }
        let loc = pixel_to_loc(pixel);

        if let Some(legal) = self.selection.legal_targets.take() {
            if legal.contains(&loc) {
                self.selection.targets.push(loc);
                if let Some(play) = self
                    .selection
                    .casting
                    .as_ref()
                    .map(|c| c.play(&self.selection.targets))
                {
                    self.queue(&play);
                }
                self.refresh_highlights();
                return;
            }
            debug!(%loc, "Click outside legal targets cancels the cast");
            self.selection.cancel_casting();
            self.refresh_highlights();
        }

        if let Some(unit_move) = self.selection.unit_move.take() {
            if let Some(route) = unit_move.routes.iter().find(|r| r.dest == loc) {
                self.queue(&MoveUnit {
                    from: unit_move.origin,
                    to: route.dest,
                });
            }
            self.refresh_highlights();
            return;
        }

        if self.registry.unit_at(loc).is_some() {
            self.queue(&SelectUnit { loc });
        }
    }

    pub fn cast_spell(&mut self, spell: &str) {
        let casting = Casting::Spell(spell.to_string());
        self.start_cast(casting);
    }

    /// Uses an ability of one of our units. Unknown units are ignored.
    pub fn use_ability(&mut self, caster: u32, ability: &str) {
        let Some(unit) = self.registry.unit(caster) else {
            debug!(caster, "Ability use for unknown unit");
            return;
        };
        let casting = Casting::Ability {
            caster,
            spell: format!("{}.{}", unit.id, ability),
        };
        self.start_cast(casting);
    }

    fn start_cast(&mut self, casting: Casting) {
        self.selection.cancel_casting();
        let play = casting.play(&[]);
        self.selection.casting = Some(casting);
        self.queue(&play);
    }

    pub fn end_turn(&mut self) {
        self.queue(&EndTurn { skip: true });
    }

    pub fn modify_resources(&mut self, resource: Resource, delta: i32) {
        self.queue(&ModifyResources { resource, delta });
    }

    pub fn modify_deck(&mut self, change: ModifyDeck) {
        self.queue(&change);
    }

    /// With bots the game starts as soon as it exists, so the bot counts as
    /// a sign-up.
    pub fn create_game(&mut self, with_bots: bool) {
        self.signups = u32::from(with_bots);
        self.queue(&CreateGame {
            bots: with_bots.then_some(1),
        });
    }

    pub fn join_game(&mut self) {
        let join = Commands::join_game(&self.deck);
        self.queue(&join);
    }

    pub fn enter_lobby(&mut self) {
        self.queue(&EnterLobby);
    }

    pub fn resign(&mut self) {
        self.reset();
        self.enter_lobby();
    }
}
