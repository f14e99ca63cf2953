use crate::types::{parse_int_list, split_list};
use crate::{Element, TryFromElement};

/// Deck editor contents for the signed in player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub deck: Vec<String>,
    pub collection: Vec<String>,
    pub resource_gain: Vec<u32>,
}

impl PlayerInfo {
    pub fn total_resource_gain(&self) -> u32 {
        self.resource_gain.iter().sum()
    }
}

impl TryFromElement for PlayerInfo {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(PlayerInfo {
            deck: split_list(el.attr("spells").unwrap_or_default()),
            collection: split_list(el.attr("collection").unwrap_or_default()),
            resource_gain: parse_int_list(el.attr("resource_gain").unwrap_or_default())?,
        })
    }
}
