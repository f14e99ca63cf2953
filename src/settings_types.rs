use bevy::prelude::Resource;
use std::path::PathBuf;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub url: String,
    /// Sent as the first line of every request.
    pub user_id: String,
    pub timeout_secs: u64,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    pub frame_rate: f64,
    /// Directory holding terrain.xml, cards.xml and friends.
    pub data_dir: PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    pub idle_delay_ms: u64,
    pub retry_delay_ms: u64,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DeckSettings {
    pub resource_gain: Vec<u32>,
    pub spells: Vec<String>,
}

#[derive(Resource, serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub network: NetworkSettings,
    pub deck: DeckSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/".to_string(),
            user_id: "player".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            frame_rate: crate::scheduler::DEFAULT_FRAME_RATE,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            idle_delay_ms: 250,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            resource_gain: vec![0, 0, 10, 0, 0, 0],
            spells: [
                "dark_adept",
                "skeleton",
                "vampire",
                "vampire_bat",
                "terror",
                "flesh_wound",
                "fireball",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}
