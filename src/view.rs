//! What the painter gets to see each frame, and the text shown in the info
//! label.

use bevy::prelude::*;
use glam::IVec2;
use packets::server::UnitAbility;
use packets::types::Loc;

use crate::avatar::DEATH_TICKS;
use crate::catalog::{GameData, Spell, SpriteRef, UnitPrototype};
use crate::draw_map::DrawTile;
use crate::registry::UnitEntity;
use crate::session::GameSession;

/// Paints one frame of the board. Implemented outside this crate by
/// whatever owns the canvas.
pub trait BoardRenderer {
    fn draw(&mut self, view: &FrameView<'_>);
}

#[derive(Debug)]
pub struct FrameView<'a> {
    pub frame: u32,
    pub highlight_alpha: f32,
    pub hovered: Option<Loc>,
    /// Empty until the board's draw metadata could be built.
    pub tiles: &'a [DrawTile],
    /// Back to front.
    pub avatars: Vec<AvatarView<'a>>,
}

#[derive(Debug)]
pub struct AvatarView<'a> {
    pub key: u32,
    pub unit: &'a UnitEntity,
    pub sprite: &'a SpriteRef,
    /// Where the unit's feet are this frame.
    pub anchor: IVec2,
    /// Top-left corner of the doubled sprite.
    pub origin: IVec2,
    pub alpha: f32,
    pub mirrored: bool,
    pub underlays: Vec<&'a SpriteRef>,
    pub overlays: Vec<&'a SpriteRef>,
}

/// Sprite origin for a unit standing at `anchor`. Sprites are drawn at twice
/// their size and sink ten pixels into the tile.
pub fn sprite_origin(anchor: IVec2, sprite: &SpriteRef) -> IVec2 {
    anchor - IVec2::new(sprite.area.w, sprite.area.h * 2 - 10)
}

pub fn frame_view<'a>(session: &'a GameSession, data: &'a GameData) -> FrameView<'a> {
    let registry = session.registry();
    let map = session.draw_map();

    let mut avatars: Vec<AvatarView<'a>> = session
        .avatars()
        .iter()
        .filter(|(_, avatar)| !avatar.is_faded())
        .filter_map(|(key, avatar)| {
            let sprite = avatar.sprite()?;
            let unit = session.avatars().unit(key, registry)?;
            let anchor = session.avatars().position(key, registry, map)?;
            let alpha = if avatar.is_dying() {
                (DEATH_TICKS - avatar.tick()) as f32 / DEATH_TICKS as f32
            } else {
                1.0
            };
            Some(AvatarView {
                key,
                unit,
                sprite,
                anchor,
                origin: sprite_origin(anchor, sprite),
                alpha,
                mirrored: unit.side & 1 == 1,
                underlays: unit.underlays.iter().filter_map(|id| data.overlay(id)).collect(),
                overlays: unit.overlays.iter().filter_map(|id| data.overlay(id)).collect(),
            })
        })
        .collect();
    // Lower units overlap the ones above them.
    avatars.sort_by_key(|a| a.anchor.y);

    FrameView {
        frame: session.frame_number(),
        highlight_alpha: session.highlight_alpha(),
        hovered: session.hovered(),
        tiles: map.map(|m| m.tiles()).unwrap_or_default(),
        avatars,
    }
}

fn describe(name: &str, life: i32, damage: i32, movement: i32, abilities: &[UnitAbility]) -> String {
    let mut desc = format!("<p><h3>{name}</h3></p><p>Life: {life}");
    if damage > 0 {
        desc.push_str(&format!("<font color=\"red\"> ({damage})</font>"));
    }
    desc.push_str(&format!("<br>Move: {movement}"));
    if !abilities.is_empty() {
        desc.push_str("<ul>");
        for ability in abilities {
            desc.push_str(&format!("{}: {}", ability.name, ability.description));
        }
        desc.push_str("</ul>");
    }
    desc.push_str("</p>");
    desc
}

/// Info label text for a unit on the board.
pub fn describe_unit(unit: &UnitEntity) -> String {
    describe(&unit.name, unit.life, unit.damage_taken, unit.movement, &unit.abilities)
}

pub fn describe_prototype(unit: &UnitPrototype) -> String {
    describe(&unit.name, unit.life, 0, unit.movement, &unit.abilities)
}

/// Summoning spells describe the monster they summon.
pub fn describe_spell(spell: &Spell, data: &GameData) -> String {
    match spell.monster.as_deref().and_then(|id| data.prototype(id)) {
        Some(monster) => describe_prototype(monster),
        None => format!("<p><h3>{}</h3></p><p>{}</p>", spell.name, spell.description),
    }
}

/// The painter the app hands each frame to.
#[derive(Resource)]
pub struct Renderer(pub Box<dyn BoardRenderer + Send + Sync>);

/// Stand-in painter for headless runs: logs what would be drawn.
#[derive(Debug, Default)]
pub struct TraceRenderer;

impl BoardRenderer for TraceRenderer {
    fn draw(&mut self, view: &FrameView<'_>) {
        tracing::trace!(
            frame = view.frame,
            tiles = view.tiles.len(),
            avatars = view.avatars.len(),
            "Frame"
        );
    }
}

pub fn render_frame(
    session: Res<GameSession>,
    data: Res<GameData>,
    renderer: Option<ResMut<Renderer>>,
) {
    let Some(mut renderer) = renderer else {
        return;
    };
    let view = frame_view(&session, &data);
    renderer.0.draw(&view);
}
