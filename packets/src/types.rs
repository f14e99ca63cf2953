use crate::Element;
use anyhow::anyhow;
use std::fmt;

/// A tile address on the board: column `x`, row `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Loc {
    pub x: i32,
    pub y: i32,
}

impl Loc {
    pub const fn new(x: i32, y: i32) -> Self {
        Loc { x, y }
    }

    /// Reads the `x`/`y` attribute pair of an element.
    pub fn from_attrs(el: &Element) -> anyhow::Result<Self> {
        Ok(Loc {
            x: el.parse_attr("x")?,
            y: el.parse_attr("y")?,
        })
    }

    /// Reads the `x`/`y` pair of the first `tag` descendant.
    pub fn from_child(el: &Element, tag: &str) -> anyhow::Result<Self> {
        let child = el
            .first(tag)
            .ok_or_else(|| anyhow!("<{}> has no <{}>", el.tag, tag))?;
        Loc::from_attrs(child)
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// The six kinds of magic resource, in their wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Gold,
    Food,
    Blood,
    Spirit,
    Holy,
    Zeal,
}

pub const NUM_RESOURCES: usize = 6;

impl Resource {
    pub const ALL: [Resource; NUM_RESOURCES] = [
        Resource::Gold,
        Resource::Food,
        Resource::Blood,
        Resource::Spirit,
        Resource::Holy,
        Resource::Zeal,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'g' => Some(Resource::Gold),
            'f' => Some(Resource::Food),
            'b' => Some(Resource::Blood),
            's' => Some(Resource::Spirit),
            'h' => Some(Resource::Holy),
            'z' => Some(Resource::Zeal),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Resource::Gold => 'g',
            Resource::Food => 'f',
            Resource::Blood => 'b',
            Resource::Spirit => 's',
            Resource::Holy => 'h',
            Resource::Zeal => 'z',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Resource::ALL.get(index).copied()
    }
}

/// Splits a comma separated list, dropping empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a comma separated list of integers.
pub fn parse_int_list<T: std::str::FromStr>(raw: &str) -> anyhow::Result<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| anyhow!("bad integer {:?} in list", s)))
        .collect()
}

/// Parses `x0,y0,x1,y1,...`. A trailing unpaired value is ignored.
pub fn parse_loc_list(raw: &str) -> anyhow::Result<Vec<Loc>> {
    let values: Vec<i32> = parse_int_list(raw)?;
    Ok(values
        .chunks_exact(2)
        .map(|pair| Loc::new(pair[0], pair[1]))
        .collect())
}

pub fn join_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loc_lists_pair_up_values() {
        let locs = parse_loc_list("0,0, 1,0,2,1,7").unwrap();
        assert_eq!(locs, vec![Loc::new(0, 0), Loc::new(1, 0), Loc::new(2, 1)]);
        assert!(parse_loc_list("").unwrap().is_empty());
        assert!(parse_loc_list("1,a").is_err());
    }

    #[test]
    fn resource_codes_follow_wire_order() {
        let codes: String = Resource::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, "gfbshz");
        assert_eq!(Resource::from_code('b').map(Resource::index), Some(2));
        assert_eq!(Resource::from_index(6), None);
    }
}
