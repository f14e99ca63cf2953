use crate::types::{Loc, parse_loc_list};
use crate::{Element, TryFromElement};

/// Destinations the selected unit at `origin` may move to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectUnitMove {
    pub origin: Loc,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub dest: Loc,
    pub steps: Vec<Loc>,
}

impl TryFromElement for SelectUnitMove {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let routes = el
            .descendants("route")
            .into_iter()
            .map(|r| {
                Ok(Route {
                    dest: Loc::from_attrs(r)?,
                    steps: parse_loc_list(r.attr("steps").unwrap_or_default())?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(SelectUnitMove {
            origin: Loc::from_attrs(el)?,
            routes,
        })
    }
}
