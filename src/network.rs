use std::any::type_name;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use network::NetworkEvent;
use packets::server::ServerMessage;
use packets::{Element, TryFromElement};
use tracing::{debug, warn};

use crate::events::NetEvent;
use crate::session::GameSession;

// Crossbeam receiver for documents coming from the request loop thread
#[derive(Resource)]
pub struct NetEventRx(pub Receiver<NetworkEvent>);

/// Commands waiting for the request loop.
#[derive(Resource)]
pub struct CommandTx(pub Sender<Element>);

pub fn drain_net_events(rx: Res<NetEventRx>, mut writer: MessageWriter<NetEvent>) {
    while let Ok(evt) = rx.0.try_recv() {
        writer.write(NetEvent(evt));
    }
}

pub fn process_net_events(mut events: MessageReader<NetEvent>, mut session: ResMut<GameSession>) {
    for NetEvent(evt) in events.read() {
        match evt {
            NetworkEvent::Response(doc) => {
                if let Some(message) = parse_message::<ServerMessage>(doc) {
                    debug!(tag = message.tag(), "Server message");
                    session.submit(message);
                }
            }
            NetworkEvent::Disconnected => warn!("Request loop stopped"),
        }
    }
}

fn parse_message<T: TryFromElement>(doc: &Element) -> Option<T> {
    match T::try_from_element(doc) {
        Ok(message) => Some(message),
        Err(err) => {
            warn!(
                ?err,
                tag = %doc.tag,
                message = type_name::<T>(),
                "Failed to parse message"
            );
            None
        }
    }
}

pub fn flush_command_outbox(mut session: ResMut<GameSession>, tx: Option<Res<CommandTx>>) {
    let commands = session.take_commands();
    let Some(tx) = tx else {
        return;
    };
    for command in commands {
        if tx.0.send(command).is_err() {
            warn!("Request loop is gone, dropping commands");
            return;
        }
    }
}
