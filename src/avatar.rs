//! Visual stand-ins for units. An avatar follows its unit by key and layers
//! transient motion (walking, lunging, fading out) over the unit's logical
//! location without ever touching the registry.

use std::collections::{BTreeMap, HashSet, VecDeque};

use glam::IVec2;
use packets::types::Loc;
use tracing::debug;

use crate::catalog::{GameData, SpriteRef};
use crate::draw_map::DrawMap;
use crate::hex::{STEP_TICKS, lerp, unit_anchor};
use crate::registry::{EntityRegistry, UnitEntity};

/// Out to the target and back.
pub const ATTACK_TICKS: u32 = 2 * STEP_TICKS;
/// A dying avatar is fully transparent from this tick on.
pub const DEATH_TICKS: u32 = STEP_TICKS;

/// What an avatar is doing. One variant at a time, so walking, attacking
/// and dying can never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Motion {
    #[default]
    Idle,
    /// Remaining path; the avatar is between the first two entries.
    Walking(VecDeque<Loc>),
    Attacking(Loc),
    Dying,
}

#[derive(Debug, Clone)]
pub struct AvatarOverlay {
    unit_key: u32,
    sprite: Option<SpriteRef>,
    tick: u32,
    position_override: Option<IVec2>,
    motion: Motion,
    /// Last known state of a unit that left the roster while fading out.
    ghost: Option<UnitEntity>,
}

impl AvatarOverlay {
    fn new(unit_key: u32) -> Self {
        AvatarOverlay {
            unit_key,
            sprite: None,
            tick: 0,
            position_override: None,
            motion: Motion::Idle,
            ghost: None,
        }
    }

    pub fn unit_key(&self) -> u32 {
        self.unit_key
    }

    pub fn sprite(&self) -> Option<&SpriteRef> {
        self.sprite.as_ref()
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn position_override(&self) -> Option<IVec2> {
        self.position_override
    }

    pub fn is_dying(&self) -> bool {
        self.motion == Motion::Dying
    }

    /// Dying and no longer visible.
    pub fn is_faded(&self) -> bool {
        self.is_dying() && self.tick >= DEATH_TICKS
    }

    pub fn ghost(&self) -> Option<&UnitEntity> {
        self.ghost.as_ref()
    }

    fn advance(&mut self, unit_loc: Option<Loc>, map: Option<&DrawMap>) {
        match &mut self.motion {
            Motion::Dying => {
                self.tick = self.tick.saturating_add(1);
            }
            Motion::Attacking(target) => {
                self.tick += 1;
                let target = *target;
                let Some(from) = unit_loc.filter(|_| self.tick < ATTACK_TICKS) else {
                    self.finish();
                    return;
                };
                let t = if self.tick > STEP_TICKS {
                    ATTACK_TICKS - self.tick
                } else {
                    self.tick
                };
                self.position_override = Some(lerp(unit_anchor(from, map), unit_anchor(target, map), t));
            }
            Motion::Walking(steps) => {
                self.tick += 1;
                if self.tick >= STEP_TICKS {
                    steps.pop_front();
                    self.tick = 0;
                }
                match (steps.front(), steps.get(1)) {
                    (Some(&from), Some(&to)) => {
                        self.position_override = Some(lerp(unit_anchor(from, map), unit_anchor(to, map), self.tick));
                    }
                    _ => self.finish(),
                }
            }
            Motion::Idle => {
                self.position_override = None;
            }
        }
    }

    fn finish(&mut self) {
        self.motion = Motion::Idle;
        self.tick = 0;
        self.position_override = None;
    }
}

/// Avatars by unit key, visited in ascending key order.
#[derive(Debug, Default)]
pub struct AvatarStore {
    avatars: BTreeMap<u32, AvatarOverlay>,
}

impl AvatarStore {
    /// Matches avatars to a fresh roster. Existing avatars keep their motion;
    /// avatars of vanished units are dropped unless they are still fading
    /// out, in which case they keep the unit's last state from `retired`.
    pub fn sync(&mut self, roster: &[UnitEntity], mut retired: Vec<UnitEntity>) {
        let live: HashSet<u32> = roster.iter().map(|u| u.key).collect();
        for unit in roster {
            let avatar = self
                .avatars
                .entry(unit.key)
                .or_insert_with(|| AvatarOverlay::new(unit.key));
            avatar.ghost = None;
        }

        self.avatars.retain(|key, avatar| {
            if live.contains(key) {
                return true;
            }
            if !avatar.is_dying() || avatar.is_faded() {
                debug!(key, "Dropping avatar of vanished unit");
                return false;
            }
            if avatar.ghost.is_none() {
                if let Some(pos) = retired.iter().position(|u| u.key == *key) {
                    avatar.ghost = Some(retired.swap_remove(pos));
                }
            }
            true
        });
    }

    pub fn clear(&mut self) {
        self.avatars.clear();
    }

    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }

    pub fn get(&self, key: u32) -> Option<&AvatarOverlay> {
        self.avatars.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &AvatarOverlay)> {
        self.avatars.iter().map(|(k, a)| (*k, a))
    }

    /// The unit an avatar draws: the live entity, or its ghost.
    pub fn unit<'a>(&'a self, key: u32, registry: &'a EntityRegistry) -> Option<&'a UnitEntity> {
        registry
            .unit(key)
            .or_else(|| self.avatars.get(&key).and_then(|a| a.ghost.as_ref()))
    }

    pub fn unit_loc(&self, key: u32, registry: &EntityRegistry) -> Option<Loc> {
        self.unit(key, registry).map(|u| u.loc)
    }

    /// First avatar, by key, whose unit stands on `loc`. Dying avatars are
    /// skipped; they cannot start anything new.
    pub fn find_at(&self, loc: Loc, registry: &EntityRegistry) -> Option<u32> {
        self.avatars
            .iter()
            .filter(|(_, a)| !a.is_dying())
            .map(|(k, _)| *k)
            .find(|k| self.unit_loc(*k, registry) == Some(loc))
    }

    /// Starts walking a path. Paths shorter than two steps have nothing to
    /// animate and leave the avatar idle.
    pub fn start_walk(&mut self, key: u32, steps: Vec<Loc>, map: Option<&DrawMap>) -> bool {
        let Some(avatar) = self.avatars.get_mut(&key).filter(|a| !a.is_dying()) else {
            return false;
        };
        avatar.finish();
        if steps.len() >= 2 {
            avatar.position_override = Some(unit_anchor(steps[0], map));
            avatar.motion = Motion::Walking(steps.into());
        }
        true
    }

    pub fn start_attack(
        &mut self,
        key: u32,
        target: Loc,
        registry: &EntityRegistry,
        map: Option<&DrawMap>,
    ) -> bool {
        let from = self.unit_loc(key, registry);
        let Some(avatar) = self.avatars.get_mut(&key).filter(|a| !a.is_dying()) else {
            return false;
        };
        avatar.finish();
        avatar.position_override = from.map(|loc| unit_anchor(loc, map));
        avatar.motion = Motion::Attacking(target);
        true
    }

    /// Starts the fade out. Any other motion is abandoned where it is.
    pub fn start_dying(&mut self, key: u32) -> bool {
        let Some(avatar) = self.avatars.get_mut(&key).filter(|a| !a.is_dying()) else {
            return false;
        };
        avatar.finish();
        avatar.motion = Motion::Dying;
        true
    }

    /// One animation tick for every avatar. Faded avatars whose unit has
    /// already left the roster are removed here.
    pub fn advance_all(&mut self, registry: &EntityRegistry, map: Option<&DrawMap>) {
        for (key, avatar) in self.avatars.iter_mut() {
            let loc = registry
                .unit(*key)
                .or(avatar.ghost.as_ref())
                .map(|u| u.loc);
            avatar.advance(loc, map);
        }
        self.avatars
            .retain(|key, avatar| !(avatar.is_faded() && registry.unit(*key).is_none()));
    }

    /// Interpolated position of an avatar's feet.
    pub fn position(&self, key: u32, registry: &EntityRegistry, map: Option<&DrawMap>) -> Option<IVec2> {
        let avatar = self.avatars.get(&key)?;
        avatar
            .position_override
            .or_else(|| self.unit_loc(key, registry).map(|loc| unit_anchor(loc, map)))
    }

    /// Resolves sprites for avatars that have none yet. Units whose art has
    /// not loaded are retried on a later frame.
    pub fn cache_sprites(&mut self, registry: &EntityRegistry, data: &GameData) {
        for (key, avatar) in self.avatars.iter_mut().filter(|(_, a)| a.sprite.is_none()) {
            let Some(unit) = registry.unit(*key).or(avatar.ghost.as_ref()) else {
                continue;
            };
            avatar.sprite = data.unit_sprite(&unit.id).cloned();
        }
    }
}
