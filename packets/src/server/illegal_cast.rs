use crate::types::{Loc, parse_loc_list};
use crate::{Element, TryFromElement};

/// The last cast needs (more) targets. An empty list cancels the cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalCast {
    pub legal_targets: Vec<Loc>,
}

impl TryFromElement for IllegalCast {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(IllegalCast {
            legal_targets: parse_loc_list(el.attr("legal_targets").unwrap_or_default())?,
        })
    }
}
