use glam::IVec2;
use packets::types::Loc;

use crate::avatar::AvatarStore;
use crate::catalog::{GameData, Rect};
use crate::hex::{HEX_HEIGHT, tile_pixel};
use crate::registry::EntityRegistry;

/// Surface sprite of a tower with no known resource, then one per resource
/// in wire order.
const NEUTRAL_TOWER: Rect = Rect::new(1, 2, 38, 40);
const RESOURCE_TOWERS: [Rect; 6] = [
    Rect::new(115, 2, 38, 40),
    Rect::new(191, 2, 38, 40),
    Rect::new(153, 2, 38, 40),
    Rect::new(115, 46, 38, 40),
    Rect::new(153, 46, 38, 40),
    Rect::new(191, 46, 38, 40),
];

/// Everything the painter needs for one cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTile {
    pub loc: Loc,
    /// Top-left of the terrain sprite; tall sprites reach up into the row
    /// above.
    pub pos: IVec2,
    pub unit_y_offset: i32,
    pub image: String,
    pub image_area: Rect,
    pub background: bool,
    pub highlight: bool,
    pub tower_area: Option<Rect>,
    /// Key of the avatar standing here.
    pub avatar: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawMap {
    width: i32,
    tiles: Vec<DrawTile>,
}

/// Deterministic per-location noise, used to vary terrain sprites.
pub fn prandom(loc: Loc) -> i64 {
    let a = (loc.x as i64 + 92872873) ^ 918273;
    let b = (loc.y as i64 + 1672517) ^ 128123;
    a.wrapping_mul(b).wrapping_add(a).wrapping_add(b)
}

impl DrawMap {
    /// Returns `None` while some terrain on the board is not loaded yet.
    pub fn build(registry: &EntityRegistry, data: &GameData, avatars: &AvatarStore) -> Option<Self> {
        let board = registry.board()?;
        let mut tiles = Vec::with_capacity(board.tiles.len());

        for (index, terrain_id) in board.tiles.iter().enumerate() {
            let terrain = data.terrain(terrain_id)?;
            let loc = board.loc_of(index);

            let pick = prandom(loc).rem_euclid(terrain.image_area.len() as i64) as usize;
            let area = *terrain.image_area.get(pick)?;

            let tower_area = (terrain.id == "tower").then(|| {
                board
                    .towers
                    .get(&index)
                    .and_then(|t| t.resource)
                    .map_or(NEUTRAL_TOWER, |r| RESOURCE_TOWERS[r.index()])
            });

            let pixel = tile_pixel(loc);
            tiles.push(DrawTile {
                loc,
                pos: IVec2::new(pixel.x, pixel.y + HEX_HEIGHT - area.h * 2),
                unit_y_offset: terrain.unit_y_offset,
                image: terrain.image.clone(),
                image_area: area,
                background: terrain.background,
                highlight: false,
                tower_area,
                avatar: None,
            });
        }

        let mut map = DrawMap {
            width: board.width,
            tiles,
        };
        map.reindex_avatars(registry, avatars);
        Some(map)
    }

    pub fn tiles(&self) -> &[DrawTile] {
        &self.tiles
    }

    fn index(&self, loc: Loc) -> Option<usize> {
        if loc.x < 0 || loc.x >= self.width || loc.y < 0 {
            return None;
        }
        let index = usize::try_from(loc.y.checked_mul(self.width)?.checked_add(loc.x)?).ok()?;
        (index < self.tiles.len()).then_some(index)
    }

    pub fn tile(&self, loc: Loc) -> Option<&DrawTile> {
        self.index(loc).map(|i| &self.tiles[i])
    }

    pub fn unit_y_offset(&self, loc: Loc) -> Option<i32> {
        self.tile(loc).map(|t| t.unit_y_offset)
    }

    /// Tiles too tall for the static background; painted every frame.
    pub fn foreground(&self) -> impl Iterator<Item = &DrawTile> {
        self.tiles.iter().filter(|t| !t.background)
    }

    /// Highlights exactly the given locations.
    pub fn set_highlights(&mut self, locs: &[Loc]) {
        for tile in &mut self.tiles {
            tile.highlight = locs.contains(&tile.loc);
        }
    }

    pub fn clear_highlights(&mut self) {
        self.set_highlights(&[]);
    }

    /// Points each tile at the avatar standing on it. A living unit wins a
    /// tile over one that is fading out.
    pub fn reindex_avatars(&mut self, registry: &EntityRegistry, avatars: &AvatarStore) {
        for tile in &mut self.tiles {
            tile.avatar = None;
        }
        for (key, avatar) in avatars.iter() {
            let Some(loc) = avatars.unit_loc(key, registry) else {
                continue;
            };
            let Some(index) = self.index(loc) else {
                continue;
            };
            let slot = &mut self.tiles[index].avatar;
            let replace = match *slot {
                None => true,
                Some(other) => avatars.get(other).is_some_and(|o| o.is_dying()) && !avatar.is_dying(),
            };
            if replace {
                *slot = Some(key);
            }
        }
    }
}
