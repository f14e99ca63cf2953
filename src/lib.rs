use bevy::prelude::*;

pub mod app_state;
pub mod avatar;
pub mod catalog;
pub mod draw_map;
pub mod events;
pub mod gate;
pub mod hex;
pub mod input;
pub mod network;
pub mod plugin;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod settings_types;
pub mod view;

pub use session::GameSession;

pub fn storage_dir() -> std::path::PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("HexWizard");
    let _ = std::fs::create_dir_all(&path);
    path
}

pub struct CoreEventsPlugin;

impl Plugin for CoreEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<events::NetEvent>()
            .add_message::<events::BoardInput>()
            .add_message::<events::SessionAction>();
    }
}

/// Everything but the session itself, which the caller inserts once it
/// knows who is playing.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            bevy::state::app::StatesPlugin,
            CoreEventsPlugin,
            plugin::GamePlugin,
        ))
        .init_state::<app_state::AppState>();
    }
}
