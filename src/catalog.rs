//! Static game data: terrain, spell cards, gui sprites, and unit art.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use bevy::prelude::Resource;
use packets::server::UnitAbility;
use packets::types::{NUM_RESOURCES, Resource as Magic};
use packets::{Element, TryFromElement};
use tracing::{info, warn};

/// Terrain sprites taller than this cover units, so the tile cannot be
/// painted as flat background.
const BACKGROUND_MAX_HEIGHT: i32 = 22;

const DEFAULT_SPRITE_SIZE: i32 = 36;

/// Pixel rectangle inside a sprite sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Parses inclusive corners `x1,y1,x2,y2`.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let values: Vec<i32> = packets::types::parse_int_list(raw)?;
        let &[x1, y1, x2, y2] = values.as_slice() else {
            bail!("rect {:?} needs four values", raw);
        };
        Ok(Rect::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    pub id: String,
    pub image: String,
    pub image_area: Vec<Rect>,
    pub unit_y_offset: i32,
    /// Whether the tile can be painted once into the static background.
    pub background: bool,
}

impl TryFromElement for Terrain {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let id: String = el.parse_attr("id")?;
        let image_area = el
            .attr("image_area")
            .unwrap_or_default()
            .split(':')
            .filter(|s| !s.trim().is_empty())
            .map(Rect::parse)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("terrain {}", id))?;
        if image_area.is_empty() {
            bail!("terrain {} has no image area", id);
        }

        let background = id != "tower" && image_area.iter().all(|a| a.h <= BACKGROUND_MAX_HEIGHT);
        Ok(Terrain {
            image: el.attr("image").unwrap_or_default().to_string(),
            unit_y_offset: el.parse_attr_opt("unit_y_offset").unwrap_or(0),
            id,
            image_area,
            background,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Required amount of each resource, in wire order.
    pub cost: [u32; NUM_RESOURCES],
    /// Unit type summoned by this spell, if any.
    pub monster: Option<String>,
}

impl TryFromElement for Spell {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let mut cost = [0; NUM_RESOURCES];
        for code in el.attr("cost").unwrap_or_default().chars() {
            if let Some(resource) = Magic::from_code(code) {
                cost[resource.index()] += 1;
            }
        }
        Ok(Spell {
            id: el.parse_attr("id")?,
            name: el.attr("name").unwrap_or_default().to_string(),
            description: el.attr("description").unwrap_or_default().to_string(),
            cost,
            monster: el.attr("monster").filter(|m| !m.is_empty()).map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuiSection {
    pub id: String,
    pub image: String,
    pub rect: Rect,
}

impl TryFromElement for GuiSection {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(GuiSection {
            id: el.parse_attr("id")?,
            image: el.attr("image").unwrap_or_default().to_string(),
            rect: Rect::parse(el.attr("rect").unwrap_or_default())?,
        })
    }
}

/// One frame of unit art: a region of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub image: String,
    pub area: Rect,
}

impl TryFromElement for SpriteRef {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(SpriteRef {
            image: el.parse_attr("image")?,
            area: Rect::new(
                el.parse_attr_opt("x").unwrap_or(0),
                el.parse_attr_opt("y").unwrap_or(0),
                el.parse_attr_opt("width").unwrap_or(DEFAULT_SPRITE_SIZE),
                el.parse_attr_opt("height").unwrap_or(DEFAULT_SPRITE_SIZE),
            ),
        })
    }
}

/// Stats of a unit type, shown when hovering the card that summons it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitPrototype {
    pub id: String,
    pub name: String,
    pub life: i32,
    pub movement: i32,
    pub abilities: Vec<UnitAbility>,
}

impl TryFromElement for UnitPrototype {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(UnitPrototype {
            id: el.parse_attr("id")?,
            name: el.attr("name").unwrap_or_default().to_string(),
            life: el.parse_attr_opt("life").unwrap_or(0),
            movement: el.parse_attr_opt("move").unwrap_or(0),
            abilities: el
                .descendants("ability")
                .into_iter()
                .map(UnitAbility::try_from_element)
                .collect::<anyhow::Result<Vec<_>>>()?,
        })
    }
}

#[derive(Resource, Debug, Default)]
pub struct GameData {
    terrain: HashMap<String, Terrain>,
    spells: HashMap<String, Spell>,
    gui: HashMap<String, GuiSection>,
    overlays: HashMap<String, SpriteRef>,
    unit_sprites: HashMap<String, SpriteRef>,
    prototypes: HashMap<String, UnitPrototype>,
}

/// Decodes every `tag` descendant, skipping the ones that fail.
fn collect<T: TryFromElement>(root: &Element, tag: &str) -> Vec<(T, Element)> {
    root.descendants(tag)
        .into_iter()
        .filter_map(|el| match T::try_from_element(el) {
            Ok(value) => Some((value, el.clone())),
            Err(err) => {
                warn!(?err, record = std::any::type_name::<T>(), "Skipping bad game data entry");
                None
            }
        })
        .collect()
}

impl GameData {
    /// Reads `terrain.xml`, `cards.xml`, `gui.xml`, `unit_overlays.xml` and
    /// `units/*.xml` from a data directory. Missing or broken files are
    /// logged and skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut data = GameData::default();

        let loaders: [(&str, fn(&mut GameData, &Element)); 4] = [
            ("terrain.xml", GameData::load_terrain),
            ("cards.xml", GameData::load_spells),
            ("gui.xml", GameData::load_gui),
            ("unit_overlays.xml", GameData::load_overlays),
        ];
        for (name, load) in loaders {
            match read_document(&dir.join(name)) {
                Ok(doc) => load(&mut data, &doc),
                Err(err) => warn!(?err, file = name, "Failed to load game data"),
            }
        }

        match fs::read_dir(dir.join("units")) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("xml") {
                        continue;
                    }
                    let Some(unit_id) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    match read_document(&path) {
                        Ok(doc) => data.load_unit(unit_id, &doc),
                        Err(err) => warn!(?err, ?path, "Failed to load unit"),
                    }
                }
            }
            Err(err) => warn!(?err, "No unit directory in game data"),
        }

        info!(
            terrain = data.terrain.len(),
            spells = data.spells.len(),
            units = data.unit_sprites.len(),
            "Game data loaded"
        );
        data
    }

    pub fn load_terrain(&mut self, root: &Element) {
        for (terrain, _) in collect::<Terrain>(root, "terrain") {
            self.terrain.insert(terrain.id.clone(), terrain);
        }
    }

    pub fn load_spells(&mut self, root: &Element) {
        for (spell, _) in collect::<Spell>(root, "spell") {
            self.spells.insert(spell.id.clone(), spell);
        }
    }

    pub fn load_gui(&mut self, root: &Element) {
        for (section, _) in collect::<GuiSection>(root, "section") {
            self.gui.insert(section.id.clone(), section);
        }
    }

    pub fn load_overlays(&mut self, root: &Element) {
        for (sprite, el) in collect::<SpriteRef>(root, "overlay") {
            if let Some(id) = el.attr("id") {
                self.overlays.insert(id.to_string(), sprite);
            }
        }
    }

    /// A unit definition: its stats plus the `stand` frame used on the board.
    pub fn load_unit(&mut self, unit_id: &str, root: &Element) {
        if let Some((sprite, _)) = collect::<SpriteRef>(root, "stand").pop() {
            self.unit_sprites.insert(unit_id.to_string(), sprite);
        }
        match UnitPrototype::try_from_element(root) {
            Ok(proto) => {
                self.prototypes.insert(unit_id.to_string(), proto);
            }
            Err(err) => warn!(?err, unit_id, "Unit definition has no usable stats"),
        }
    }

    pub fn terrain(&self, id: &str) -> Option<&Terrain> {
        self.terrain.get(id)
    }

    pub fn spell(&self, id: &str) -> Option<&Spell> {
        self.spells.get(id)
    }

    pub fn gui_section(&self, id: &str) -> Option<&GuiSection> {
        self.gui.get(id)
    }

    pub fn overlay(&self, id: &str) -> Option<&SpriteRef> {
        self.overlays.get(id)
    }

    pub fn unit_sprite(&self, unit_id: &str) -> Option<&SpriteRef> {
        self.unit_sprites.get(unit_id)
    }

    pub fn prototype(&self, unit_id: &str) -> Option<&UnitPrototype> {
        self.prototypes.get(unit_id)
    }
}

fn read_document(path: &Path) -> anyhow::Result<Element> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    Element::parse(&text).with_context(|| format!("parsing {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Element {
        Element::parse(text).unwrap()
    }

    #[test]
    fn terrain_areas_and_background() {
        let mut data = GameData::default();
        data.load_terrain(&doc(
            r#"<terrain_list>
                <terrain id="grass" image="grass.png" image_area="0,0,57,19:58,0,115,19"/>
                <terrain id="forest" image="forest.png" image_area="0,0,57,29" unit_y_offset="-4"/>
                <terrain id="tower" image="tower.png" image_area="0,0,57,19"/>
                <terrain id="void" image="void.png"/>
            </terrain_list>"#,
        ));

        let grass = data.terrain("grass").unwrap();
        assert_eq!(grass.image_area, [Rect::new(0, 0, 58, 20), Rect::new(58, 0, 58, 20)]);
        assert!(grass.background);
        assert_eq!(grass.unit_y_offset, 0);

        let forest = data.terrain("forest").unwrap();
        assert!(!forest.background);
        assert_eq!(forest.unit_y_offset, -4);

        assert!(!data.terrain("tower").unwrap().background);
        assert!(data.terrain("void").is_none());
    }

    #[test]
    fn spell_costs_count_letters() {
        let mut data = GameData::default();
        data.load_spells(&doc(
            r#"<cards><spell id="skeleton" name="Skeleton" cost="bbg" monster="skeleton"/><spell id="terror" cost=""/></cards>"#,
        ));
        let skeleton = data.spell("skeleton").unwrap();
        assert_eq!(skeleton.cost, [1, 0, 2, 0, 0, 0]);
        assert_eq!(skeleton.monster.as_deref(), Some("skeleton"));
        assert_eq!(data.spell("terror").unwrap().monster, None);
    }

    #[test]
    fn unit_sprites_default_to_36px() {
        let mut data = GameData::default();
        data.load_unit(
            "skeleton",
            &doc(r#"<unit id="skeleton" name="Skeleton" life="2" move="3"><stand image="units/skeleton.png" x="4" y="8"/></unit>"#),
        );
        data.load_overlays(&doc(
            r#"<overlays><overlay id="poison" image="poison.png" width="20" height="10"/></overlays>"#,
        ));
        data.load_gui(&doc(r#"<gui><section id="defense_icon" image="gui.png" rect="0,0,9,5"/></gui>"#));

        assert_eq!(
            data.unit_sprite("skeleton").unwrap().area,
            Rect::new(4, 8, 36, 36)
        );
        assert_eq!(data.prototype("skeleton").unwrap().movement, 3);
        assert_eq!(data.overlay("poison").unwrap().area, Rect::new(0, 0, 20, 10));
        assert_eq!(data.gui_section("defense_icon").unwrap().rect, Rect::new(0, 0, 10, 6));
    }

    #[test]
    fn rect_needs_four_values() {
        assert!(Rect::parse("1,2,3").is_err());
        assert!(Rect::parse("a,b,c,d").is_err());
    }
}
