//! Commands the client sends to the server.

use crate::types::{Loc, Resource, join_list};
use crate::{Element, ToElement};

fn loc_element(tag: &str, loc: Loc) -> Element {
    Element::new(tag).with_attr("x", loc.x).with_attr("y", loc.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectUnit {
    pub loc: Loc,
}

impl ToElement for SelectUnit {
    const TAG: &'static str = "select_unit";

    fn write_attrs(&self, el: Element) -> Element {
        el.with_attr("x", self.loc.x).with_attr("y", self.loc.y)
    }
}

/// Confirms a move and asks for the abilities usable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveUnit {
    pub from: Loc,
    pub to: Loc,
}

impl ToElement for MoveUnit {
    const TAG: &'static str = "move";

    fn write_attrs(&self, el: Element) -> Element {
        el.with_child(Element::new("query_abilities"))
            .with_child(loc_element("from", self.from))
            .with_child(loc_element("to", self.to))
    }
}

/// Casts a spell, or uses a unit ability when `caster` is set. The spell id
/// of an ability is `<unit type>.<ability id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    pub spell: String,
    pub caster: Option<u32>,
    pub targets: Vec<Loc>,
}

impl ToElement for Play {
    const TAG: &'static str = "play";

    fn write_attrs(&self, el: Element) -> Element {
        let mut el = el.with_attr("spell", &self.spell);
        if let Some(caster) = self.caster {
            el = el.with_attr("caster", caster);
        }
        for target in &self.targets {
            el = el.with_child(loc_element("target", *target));
        }
        el
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyResources {
    pub resource: Resource,
    pub delta: i32,
}

impl ToElement for ModifyResources {
    const TAG: &'static str = "modify_resources";

    fn write_attrs(&self, el: Element) -> Element {
        el.with_attr("resource", self.resource.code())
            .with_attr("delta", self.delta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyDeck {
    Add(String),
    Remove(String),
}

impl ToElement for ModifyDeck {
    const TAG: &'static str = "modify_deck";

    fn write_attrs(&self, el: Element) -> Element {
        match self {
            ModifyDeck::Add(id) => el.with_attr("add", id),
            ModifyDeck::Remove(id) => el.with_attr("remove", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndTurn {
    pub skip: bool,
}

impl ToElement for EndTurn {
    const TAG: &'static str = "end_turn";

    fn write_attrs(&self, el: Element) -> Element {
        if self.skip {
            el.with_attr("skip", "yes")
        } else {
            el
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateGame {
    pub bots: Option<u32>,
}

impl ToElement for CreateGame {
    const TAG: &'static str = "create_game";

    fn write_attrs(&self, el: Element) -> Element {
        match self.bots {
            Some(bots) => el.with_attr("bots", bots),
            None => el,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterLobby;

impl ToElement for EnterLobby {
    const TAG: &'static str = "enter_lobby";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestUpdates;

impl ToElement for RequestUpdates {
    const TAG: &'static str = "request_updates";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinGame;

impl ToElement for JoinGame {
    const TAG: &'static str = "join_game";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setup;

impl ToElement for Setup {
    const TAG: &'static str = "setup";
}

/// The deck a player brings into a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckChoice {
    pub resource_gain: Vec<u32>,
    pub spells: Vec<String>,
}

impl ToElement for DeckChoice {
    const TAG: &'static str = "spells";

    fn write_attrs(&self, el: Element) -> Element {
        el.with_attr("resource_gain", join_list(&self.resource_gain))
            .with_attr("spells", self.spells.join(","))
    }
}

/// Several commands delivered in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands(pub Vec<Element>);

impl Commands {
    pub fn push<T: ToElement>(mut self, command: &T) -> Self {
        self.0.push(command.to_element());
        self
    }

    pub fn join_game(deck: &DeckChoice) -> Self {
        Commands::default().push(&JoinGame).push(deck)
    }

    pub fn setup(deck: &DeckChoice) -> Self {
        Commands::default().push(&Setup).push(deck)
    }
}

impl ToElement for Commands {
    const TAG: &'static str = "commands";

    fn write_attrs(&self, el: Element) -> Element {
        self.0.iter().cloned().fold(el, Element::with_child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_unit() {
        let cmd = MoveUnit {
            from: Loc::new(1, 2),
            to: Loc::new(3, 2),
        };
        insta::assert_snapshot!(
            cmd.to_markup(),
            @r#"<move><query_abilities/><from x="1" y="2"/><to x="3" y="2"/></move>"#
        );
    }

    #[test]
    fn test_play_ability_with_targets() {
        let cmd = Play {
            spell: "skeleton.bite".into(),
            caster: Some(7),
            targets: vec![Loc::new(4, 4)],
        };
        insta::assert_snapshot!(
            cmd.to_markup(),
            @r#"<play spell="skeleton.bite" caster="7"><target x="4" y="4"/></play>"#
        );
        let spell = Play {
            spell: "fireball".into(),
            caster: None,
            targets: vec![],
        };
        assert_eq!(spell.to_markup(), r#"<play spell="fireball"/>"#);
    }

    #[test]
    fn test_setup_batch() {
        let deck = DeckChoice {
            resource_gain: vec![0, 0, 10, 0, 0, 0],
            spells: vec!["skeleton".into(), "fireball".into()],
        };
        insta::assert_snapshot!(
            Commands::setup(&deck).to_markup(),
            @r#"<commands><setup/><spells resource_gain="0,0,10,0,0,0" spells="skeleton,fireball"/></commands>"#
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(EndTurn { skip: true }.to_markup(), r#"<end_turn skip="yes"/>"#);
        assert_eq!(CreateGame { bots: Some(1) }.to_markup(), r#"<create_game bots="1"/>"#);
        assert_eq!(
            ModifyResources {
                resource: Resource::Blood,
                delta: -1
            }
            .to_markup(),
            r#"<modify_resources resource="b" delta="-1"/>"#
        );
        assert_eq!(
            ModifyDeck::Remove("terror".into()).to_markup(),
            r#"<modify_deck remove="terror"/>"#
        );
        assert_eq!(RequestUpdates.to_markup(), "<request_updates/>");
    }
}
