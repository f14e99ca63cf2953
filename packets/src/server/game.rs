use crate::types::{Loc, Resource, parse_int_list, split_list};
use crate::{Element, TryFromElement};
use anyhow::bail;

/// Full authoritative state of a running game.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub width: i32,
    pub height: i32,
    /// Terrain id per cell, row major.
    pub tiles: Vec<String>,
    pub players: Vec<PlayerState>,
    pub units: Vec<UnitInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub name: String,
    pub unit_limit: Option<u32>,
    /// Only present for the player the snapshot was sent to.
    pub resources: Option<Vec<i32>>,
    pub resource_gain: Vec<i32>,
    pub spells: Vec<SpellSlot>,
    pub towers: Vec<TowerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellSlot {
    pub id: String,
    pub embargo: u32,
    pub castable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TowerInfo {
    pub loc: Loc,
    pub resource: Option<Resource>,
    pub owner: usize,
}

#[derive(Debug, Clone, Default)]
pub struct UnitInfo {
    pub key: u32,
    /// Unit type, e.g. `skeleton`.
    pub id: String,
    pub name: String,
    pub side: u8,
    pub loc: Loc,
    pub life: i32,
    pub effective_life: i32,
    pub damage_taken: i32,
    /// Negative armor is a vulnerability.
    pub armor: i32,
    pub effective_armor: i32,
    pub movement: i32,
    pub has_moved: bool,
    pub overlays: Vec<String>,
    pub underlays: Vec<String>,
    pub abilities: Vec<UnitAbility>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitAbility {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub taps_caster: bool,
    pub usable: bool,
}

impl TryFromElement for GameSnapshot {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let width: i32 = el.parse_attr("width")?;
        let height: i32 = el.parse_attr("height")?;
        if width <= 0 || height <= 0 {
            bail!("game board has no cells ({}x{})", width, height);
        }
        let Some(cells) = width.checked_mul(height) else {
            bail!("game board {}x{} is too large", width, height);
        };

        let tiles: Vec<String> = el
            .attr("tiles")
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_string())
            .collect();
        if tiles.len() != cells as usize {
            bail!(
                "game has {} tiles for a {}x{} board",
                tiles.len(),
                width,
                height
            );
        }

        let players = el
            .descendants("player")
            .into_iter()
            .enumerate()
            .map(|(n, p)| parse_player(p, n))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let units = el
            .descendants("unit")
            .into_iter()
            .map(UnitInfo::try_from_element)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(GameSnapshot {
            width,
            height,
            tiles,
            players,
            units,
        })
    }
}

fn parse_player(el: &Element, index: usize) -> anyhow::Result<PlayerState> {
    let mut player = PlayerState {
        name: el.attr("name").unwrap_or_default().to_string(),
        unit_limit: el.parse_attr_opt("unit_limit"),
        ..Default::default()
    };

    for tower in el.descendants("tower") {
        player.towers.push(TowerInfo {
            loc: Loc::from_attrs(tower)?,
            resource: tower
                .attr("resource")
                .and_then(|r| r.chars().next())
                .and_then(Resource::from_code),
            owner: index,
        });
    }

    let Some(resources) = el.attr("resources") else {
        return Ok(player);
    };
    player.resources = Some(parse_int_list(resources)?);
    player.resource_gain = parse_int_list(el.attr("resource_gain").unwrap_or_default())?;
    player.spells = split_list(el.attr("spells").unwrap_or_default())
        .iter()
        .map(|entry| parse_spell_slot(entry))
        .collect();

    Ok(player)
}

// "<id> [embargo] [castable]"
fn parse_spell_slot(entry: &str) -> SpellSlot {
    let mut items = entry.split_whitespace();
    let id = items.next().unwrap_or_default().to_string();
    let embargo = items.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let castable = items.next().and_then(|s| s.parse::<u32>().ok()) == Some(1);
    SpellSlot {
        id,
        embargo,
        castable,
    }
}

impl TryFromElement for UnitInfo {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let life = el.parse_attr_opt("life").unwrap_or(0);
        let armor = el.parse_attr_opt("armor").unwrap_or(0);

        Ok(UnitInfo {
            key: el.parse_attr("key")?,
            id: el.parse_attr("id")?,
            name: el.attr("name").unwrap_or_default().to_string(),
            side: el.parse_attr("side")?,
            loc: Loc::from_attrs(el)?,
            life,
            effective_life: el
                .parse_attr_opt("effective_life")
                .filter(|v| *v != 0)
                .unwrap_or(life),
            damage_taken: el.parse_attr_opt("damage_taken").unwrap_or(0),
            armor,
            effective_armor: el
                .parse_attr_opt("effective_armor")
                .filter(|v| *v != 0)
                .unwrap_or(armor),
            movement: el.parse_attr_opt("move").unwrap_or(0),
            has_moved: el.attr("has_moved") == Some("yes"),
            overlays: split_list(el.attr("overlays").unwrap_or_default()),
            underlays: split_list(el.attr("underlays").unwrap_or_default()),
            abilities: el
                .descendants("ability")
                .into_iter()
                .map(UnitAbility::try_from_element)
                .collect::<anyhow::Result<Vec<_>>>()?,
        })
    }
}

impl TryFromElement for UnitAbility {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(UnitAbility {
            id: el.parse_attr("id")?,
            name: el.attr("name").unwrap_or_default().to_string(),
            description: el.attr("description").unwrap_or_default().to_string(),
            icon: format!("abilities/{}", el.attr("icon").unwrap_or_default()),
            taps_caster: el.attr("taps_caster") == Some("yes"),
            usable: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"<game width="3" height="2" tiles="grass,grass,tower,water,grass,grass">
        <player name="alice" unit_limit="4" resources="1,0,3,0,0,0" resource_gain="0,0,10,0,0,0"
                spells="skeleton 0 1,fireball 2 0,terror">
            <tower x="2" y="0" resource="b"/>
        </player>
        <player name="bob" unit_limit="4"/>
        <unit key="7" id="skeleton" name="Skeleton" side="1" x="1" y="1" life="3"
              damage_taken="1" armor="-1" move="2" has_moved="yes" overlays="poison,,slow">
            <ability id="bite" name="Bite" icon="bite.png" description="Bites" taps_caster="yes"/>
        </unit>
    </game>"#;

    #[test]
    fn test_game_snapshot() {
        let el = Element::parse(GAME).unwrap();
        let game = GameSnapshot::try_from_element(&el).unwrap();

        assert_eq!((game.width, game.height), (3, 2));
        assert_eq!(game.tiles[2], "tower");
        assert_eq!(game.players.len(), 2);

        let alice = &game.players[0];
        assert_eq!(alice.resources.as_deref(), Some(&[1, 0, 3, 0, 0, 0][..]));
        assert_eq!(
            alice.spells[0],
            SpellSlot {
                id: "skeleton".into(),
                embargo: 0,
                castable: true
            }
        );
        assert!(!alice.spells[1].castable);
        assert_eq!(alice.spells[2].embargo, 0);
        assert_eq!(alice.towers[0].resource, Some(Resource::Blood));
        assert!(game.players[1].resources.is_none());

        let unit = &game.units[0];
        assert_eq!(unit.key, 7);
        assert_eq!(unit.loc, Loc::new(1, 1));
        assert_eq!(unit.effective_life, 3);
        assert_eq!(unit.armor, -1);
        assert_eq!(unit.effective_armor, -1);
        assert!(unit.has_moved);
        assert_eq!(unit.overlays, ["poison", "slow"]);
        assert_eq!(unit.abilities[0].icon, "abilities/bite.png");
        assert!(unit.abilities[0].taps_caster);
    }

    #[test]
    fn unit_without_key_fails_the_whole_snapshot() {
        let el = Element::parse(
            r#"<game width="1" height="1" tiles="grass"><unit id="x" side="0" x="0" y="0"/></game>"#,
        )
        .unwrap();
        assert!(GameSnapshot::try_from_element(&el).is_err());
    }

    #[test]
    fn tile_count_must_match_board() {
        let el = Element::parse(r#"<game width="2" height="2" tiles="grass"/>"#).unwrap();
        assert!(GameSnapshot::try_from_element(&el).is_err());
    }

    #[test]
    fn oversized_board_is_rejected() {
        let el = Element::parse(r#"<game width="100000" height="100000" tiles="grass"/>"#).unwrap();
        let err = GameSnapshot::try_from_element(&el).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
