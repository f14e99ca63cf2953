use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use tracing_subscriber::EnvFilter;

use hexwizard::catalog::GameData;
use hexwizard::network::{CommandTx, NetEventRx};
use hexwizard::scheduler::frame_interval;
use hexwizard::settings::Settings;
use hexwizard::view::{Renderer, TraceRenderer};
use hexwizard::{CorePlugin, GameSession};
use network::{HttpTransport, spawn_request_loop};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .ok();

    let settings = Settings::load();
    let data = GameData::load_dir(&settings.client.data_dir);

    let transport = HttpTransport::new(
        settings.server.url.clone(),
        settings.server.user_id.clone(),
        settings.request_timeout(),
    )?;
    let requests = spawn_request_loop(transport, settings.loop_config());
    tracing::info!(url = %settings.server.url, user = %settings.server.user_id, "Request loop started");

    let mut session = GameSession::new(settings.server.user_id.clone(), settings.deck_choice());
    session.enter_lobby();

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame_interval(
            settings.client.frame_rate,
        ))),
    )
    .add_plugins(CorePlugin)
    .insert_resource(data)
    .insert_resource(session)
    .insert_resource(NetEventRx(requests.events))
    .insert_resource(CommandTx(requests.commands))
    .insert_resource(Renderer(Box::new(TraceRenderer)))
    .insert_resource(settings);

    app.run();
    Ok(())
}
