use crate::types::Loc;
use crate::{Element, TryFromElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathAnim {
    pub loc: Loc,
}

impl TryFromElement for DeathAnim {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        Ok(DeathAnim {
            loc: Loc::from_attrs(el)?,
        })
    }
}
