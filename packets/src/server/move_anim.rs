use crate::types::{Loc, parse_loc_list};
use crate::{Element, TryFromElement};

/// A unit walked from `from` to `to` along `steps` (both ends included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAnim {
    pub from: Loc,
    pub to: Loc,
    pub steps: Vec<Loc>,
}

impl TryFromElement for MoveAnim {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let from = Loc::from_child(el, "from")?;
        let to = Loc::from_child(el, "to")?;
        let steps = parse_loc_list(el.attr("steps").unwrap_or_default())?;
        Ok(MoveAnim { from, to, steps })
    }
}
