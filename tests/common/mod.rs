#![allow(dead_code)]

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use crossbeam_channel::{Receiver, Sender};
use glam::IVec2;
use hexwizard::app_state::AppState;
use hexwizard::catalog::GameData;
use hexwizard::events::{BoardInput, SessionAction};
use hexwizard::hex::tile_center;
use hexwizard::network::{CommandTx, NetEventRx};
use hexwizard::view::{BoardRenderer, FrameView, Renderer};
use hexwizard::{CorePlugin, GameSession};
use network::NetworkEvent;
use packets::Element;
use packets::client::DeckChoice;
use packets::types::Loc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TERRAIN: &str = r#"<terrain_types>
    <terrain id="grass" image="terrain.png" image_area="0,0,57,35" unit_y_offset="4"/>
</terrain_types>"#;

pub const SKELETON: &str = r#"<unit id="skeleton" name="Skeleton" life="2" move="3">
    <stand image="skeleton.png" x="0" y="0"/>
</unit>"#;

/// What the painter was shown on one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedFrame {
    pub frame: u32,
    pub tiles: usize,
    pub avatars: Vec<(u32, IVec2, f32)>,
}

struct RecordingRenderer(Arc<Mutex<Vec<PaintedFrame>>>);

impl BoardRenderer for RecordingRenderer {
    fn draw(&mut self, view: &FrameView<'_>) {
        let frame = PaintedFrame {
            frame: view.frame,
            tiles: view.tiles.len(),
            avatars: view
                .avatars
                .iter()
                .map(|a| (a.key, a.anchor, a.alpha))
                .collect(),
        };
        if let Ok(mut frames) = self.0.lock() {
            frames.push(frame);
        }
    }
}

/// A headless client wired to in-memory channels instead of a server.
pub struct TestClient {
    app: App,
    server: Sender<NetworkEvent>,
    commands: Receiver<Element>,
    painted: Arc<Mutex<Vec<PaintedFrame>>>,
}

impl TestClient {
    pub fn new() -> Self {
        let (server, events) = crossbeam_channel::unbounded();
        let (commands_tx, commands) = crossbeam_channel::unbounded();
        let painted = Arc::new(Mutex::new(Vec::new()));

        let mut data = GameData::default();
        data.load_terrain(&Element::parse(TERRAIN).expect("terrain"));
        data.load_unit("skeleton", &Element::parse(SKELETON).expect("unit"));

        let deck = DeckChoice {
            resource_gain: vec![0, 0, 10, 0, 0, 0],
            spells: vec!["skeleton".into(), "fireball".into()],
        };

        let mut app = App::new();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
        app.add_plugins(MinimalPlugins).add_plugins(CorePlugin);
        app.insert_resource(data)
            .insert_resource(GameSession::new("alice", deck))
            .insert_resource(NetEventRx(events))
            .insert_resource(CommandTx(commands_tx))
            .insert_resource(Renderer(Box::new(RecordingRenderer(painted.clone()))));

        Self {
            app,
            server,
            commands,
            painted,
        }
    }

    pub fn server_sends(&self, markup: &str) {
        let doc = Element::parse(markup).expect("test markup parses");
        self.server
            .send(NetworkEvent::Response(doc))
            .expect("client is listening");
    }

    pub fn disconnect(&self) {
        self.server
            .send(NetworkEvent::Disconnected)
            .expect("client is listening");
    }

    pub fn frame(&mut self) {
        self.app.update();
    }

    pub fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.frame();
        }
    }

    pub fn session(&self) -> &GameSession {
        self.app.world().resource::<GameSession>()
    }

    pub fn state(&self) -> AppState {
        *self.app.world().resource::<State<AppState>>().get()
    }

    /// Commands flushed to the request loop since the last call.
    pub fn sent(&self) -> Vec<String> {
        self.commands.try_iter().map(|c| c.to_string()).collect()
    }

    pub fn last_painted(&self) -> Option<PaintedFrame> {
        self.painted.lock().ok()?.last().cloned()
    }

    pub fn click(&mut self, loc: Loc) {
        self.app
            .world_mut()
            .write_message(BoardInput::Click(tile_center(loc)));
    }

    pub fn hover(&mut self, loc: Loc) {
        self.app
            .world_mut()
            .write_message(BoardInput::Hover(tile_center(loc)));
    }

    pub fn action(&mut self, action: SessionAction) {
        self.app.world_mut().write_message(action);
    }
}
