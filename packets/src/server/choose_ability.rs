use crate::types::split_list;
use crate::{Element, TryFromElement};

/// Abilities of unit `unit` that may be used right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooseAbility {
    pub unit: u32,
    pub abilities: Vec<String>,
}

impl TryFromElement for ChooseAbility {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(ChooseAbility {
            unit: el.parse_attr("unit")?,
            abilities: split_list(el.attr("abilities").unwrap_or_default()),
        })
    }
}
