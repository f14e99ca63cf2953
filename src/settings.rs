pub use crate::settings_types::*;
use crate::storage_dir;
use network::LoopConfig;
use packets::client::DeckChoice;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&storage_dir().join("settings.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("Creating default settings at {:?}", path);
            let default_settings = Settings::default();
            default_settings.save_to(path);
            return default_settings;
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(s) => {
                    info!("Loaded settings from {:?}", path);
                    s
                }
                Err(e) => {
                    error!("Failed to parse settings.toml: {}", e);
                    Settings::default()
                }
            },
            Err(e) => {
                error!("Failed to read settings.toml: {}", e);
                Settings::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&storage_dir().join("settings.toml"));
    }

    pub fn save_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    error!("Failed to write settings.toml: {}", e);
                } else {
                    info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            idle_delay: Duration::from_millis(self.network.idle_delay_ms),
            retry_delay: Duration::from_millis(self.network.retry_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    pub fn deck_choice(&self) -> DeckChoice {
        DeckChoice {
            resource_gain: self.deck.resource_gain.clone(),
            spells: self.deck.spells.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("hexwizard-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = scratch_file("missing");
        let settings = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch_file("partial");
        fs::write(&path, "[server]\nuser_id = \"alice\"\n\n[network]\nidle_delay_ms = 50\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.server.user_id, "alice");
        assert_eq!(settings.server.url, ServerSettings::default().url);
        assert_eq!(settings.loop_config().idle_delay, Duration::from_millis(50));
        assert_eq!(settings.loop_config().retry_delay, Duration::from_secs(1));
        assert_eq!(settings.deck_choice().spells.len(), 7);
    }

    #[test]
    fn unparsable_file_falls_back() {
        let path = scratch_file("broken");
        fs::write(&path, "server = [[[").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
