use crate::types::Loc;
use crate::{Element, TryFromElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackAnim {
    pub from: Loc,
    pub to: Loc,
}

impl TryFromElement for AttackAnim {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(AttackAnim {
            from: Loc::from_child(el, "from")?,
            to: Loc::from_child(el, "to")?,
        })
    }
}
