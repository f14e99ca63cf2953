use crate::{Element, TryFromElement};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lobby {
    pub games: Vec<LobbyGame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyGame {
    pub clients: String,
    pub started: bool,
}

impl TryFromElement for Lobby {
    fn try_from_element(el: &Element) -> anyhow::Result<Self> {
        let games = el
            .descendants("game")
            .into_iter()
            .map(|g| LobbyGame {
                clients: g.attr("clients").unwrap_or_default().to_string(),
                started: g.attr("started") != Some("no"),
            })
            .collect();
        Ok(Lobby { games })
    }
}
