use std::collections::HashMap;

use packets::server::{GameSnapshot, PlayerState, TowerInfo, UnitInfo};
use packets::types::Loc;
use tracing::debug;

/// A battle unit as last reported by the server. Identity is `key`.
pub type UnitEntity = UnitInfo;

#[derive(Debug, Clone, Default)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    /// Terrain id per cell, row major.
    pub tiles: Vec<String>,
    /// Towers by cell index.
    pub towers: HashMap<usize, TowerInfo>,
}

impl Board {
    pub fn index(&self, loc: Loc) -> Option<usize> {
        if loc.x < 0 || loc.y < 0 || loc.x >= self.width || loc.y >= self.height {
            return None;
        }
        Some((loc.y * self.width + loc.x) as usize)
    }

    pub fn loc_of(&self, index: usize) -> Loc {
        let index = index as i32;
        Loc::new(index % self.width, index / self.width)
    }

    pub fn terrain(&self, loc: Loc) -> Option<&str> {
        self.index(loc)
            .and_then(|i| self.tiles.get(i))
            .map(String::as_str)
    }
}

/// Local mirror of the server's game state. Replaced wholesale by every
/// `game` snapshot, touched in place only for light updates.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    board: Option<Board>,
    players: Vec<PlayerState>,
    units: Vec<UnitEntity>,
    player_side: Option<usize>,
}

impl EntityRegistry {
    /// Installs a new snapshot and hands back the roster it replaced.
    pub fn replace(&mut self, snapshot: GameSnapshot, user_id: &str) -> Vec<UnitEntity> {
        let GameSnapshot {
            width,
            height,
            tiles,
            players,
            units,
        } = snapshot;

        let mut board = Board {
            width,
            height,
            tiles,
            towers: HashMap::new(),
        };
        for tower in players.iter().flat_map(|p| p.towers.iter()) {
            match board.index(tower.loc) {
                Some(index) => {
                    board.towers.insert(index, *tower);
                }
                None => debug!(loc = %tower.loc, "Ignoring tower off the board"),
            }
        }

        if let Some(side) = players.iter().position(|p| p.name == user_id) {
            self.player_side = Some(side);
        }

        self.board = Some(board);
        self.players = players;
        std::mem::replace(&mut self.units, units)
    }

    pub fn clear(&mut self) {
        *self = EntityRegistry::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// Index of the local player, matched by name against the user id.
    pub fn player_side(&self) -> Option<usize> {
        self.player_side
    }

    pub fn local_player(&self) -> Option<&PlayerState> {
        self.player_side.and_then(|side| self.players.get(side))
    }

    pub fn units(&self) -> &[UnitEntity] {
        &self.units
    }

    pub fn unit(&self, key: u32) -> Option<&UnitEntity> {
        self.units.iter().find(|u| u.key == key)
    }

    pub fn unit_mut(&mut self, key: u32) -> Option<&mut UnitEntity> {
        self.units.iter_mut().find(|u| u.key == key)
    }

    pub fn unit_at(&self, loc: Loc) -> Option<&UnitEntity> {
        self.units.iter().find(|u| u.loc == loc)
    }

    pub fn set_unit_location(&mut self, key: u32, loc: Loc) -> bool {
        match self.unit_mut(key) {
            Some(unit) => {
                unit.loc = loc;
                true
            }
            None => false,
        }
    }

    /// Marks exactly the listed abilities of a unit usable.
    pub fn mark_usable_abilities(&mut self, key: u32, ids: &[String]) -> bool {
        let Some(unit) = self.unit_mut(key) else {
            return false;
        };
        for ability in &mut unit.abilities {
            ability.usable = ids.contains(&ability.id);
        }
        true
    }

    pub fn clear_usable_abilities(&mut self) {
        for ability in self.units.iter_mut().flat_map(|u| u.abilities.iter_mut()) {
            ability.usable = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::server::UnitAbility;

    fn unit(key: u32, x: i32, y: i32) -> UnitEntity {
        UnitEntity {
            key,
            id: "skeleton".into(),
            name: "Skeleton".into(),
            loc: Loc::new(x, y),
            life: 2,
            effective_life: 2,
            ..Default::default()
        }
    }

    fn snapshot(units: Vec<UnitEntity>) -> GameSnapshot {
        GameSnapshot {
            width: 3,
            height: 2,
            tiles: vec!["grass".into(); 6],
            players: vec![
                PlayerState {
                    name: "bob".into(),
                    ..Default::default()
                },
                PlayerState {
                    name: "alice".into(),
                    towers: vec![TowerInfo {
                        loc: Loc::new(2, 1),
                        resource: None,
                        owner: 1,
                    }],
                    ..Default::default()
                },
            ],
            units,
        }
    }

    #[test]
    fn replace_returns_previous_roster() {
        let mut registry = EntityRegistry::default();
        assert!(registry.replace(snapshot(vec![unit(1, 0, 0)]), "alice").is_empty());
        assert_eq!(registry.player_side(), Some(1));
        assert_eq!(registry.local_player().map(|p| p.name.as_str()), Some("alice"));
        assert!(registry.board().unwrap().towers.contains_key(&5));

        let old = registry.replace(snapshot(vec![unit(2, 1, 1)]), "alice");
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].key, 1);
        assert!(registry.unit(1).is_none());
        assert_eq!(registry.unit_at(Loc::new(1, 1)).map(|u| u.key), Some(2));
    }

    #[test]
    fn light_updates_touch_one_unit() {
        let mut registry = EntityRegistry::default();
        let mut u = unit(4, 0, 0);
        u.abilities = vec![
            UnitAbility {
                id: "bite".into(),
                ..Default::default()
            },
            UnitAbility {
                id: "drain".into(),
                usable: true,
                ..Default::default()
            },
        ];
        registry.replace(snapshot(vec![u, unit(5, 2, 0)]), "carol");
        assert_eq!(registry.player_side(), None);

        assert!(registry.set_unit_location(4, Loc::new(1, 0)));
        assert!(!registry.set_unit_location(99, Loc::new(1, 0)));
        assert_eq!(registry.unit(4).unwrap().loc, Loc::new(1, 0));

        assert!(registry.mark_usable_abilities(4, &["bite".to_string()]));
        let usable: Vec<bool> = registry.unit(4).unwrap().abilities.iter().map(|a| a.usable).collect();
        assert_eq!(usable, [true, false]);

        registry.clear_usable_abilities();
        assert!(registry.unit(4).unwrap().abilities.iter().all(|a| !a.usable));
    }

    #[test]
    fn board_indexing_is_bounds_checked() {
        let mut registry = EntityRegistry::default();
        registry.replace(snapshot(vec![]), "alice");
        let board = registry.board().unwrap();
        assert_eq!(board.index(Loc::new(2, 1)), Some(5));
        assert_eq!(board.index(Loc::new(3, 0)), None);
        assert_eq!(board.index(Loc::new(0, -1)), None);
        assert_eq!(board.loc_of(4), Loc::new(1, 1));

        registry.clear();
        assert!(!registry.is_loaded());
    }

    #[test]
    fn towers_off_the_board_are_dropped() {
        let mut game = snapshot(vec![]);
        game.players[0].towers = vec![
            TowerInfo {
                loc: Loc::new(3, 0),
                resource: None,
                owner: 0,
            },
            TowerInfo {
                loc: Loc::new(0, i32::MAX),
                resource: None,
                owner: 0,
            },
        ];
        let mut registry = EntityRegistry::default();
        registry.replace(game, "alice");

        let towers = &registry.board().unwrap().towers;
        assert_eq!(towers.len(), 1);
        assert!(towers.contains_key(&5));
        assert!(!towers.contains_key(&3));
    }
}
