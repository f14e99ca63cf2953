pub mod http;
pub mod protocol;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use packets::client::RequestUpdates;
use packets::{Element, ToElement};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use http::HttpTransport;

/// One request/response round trip with the server.
pub trait Transport {
    fn exchange(&mut self, markup: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Response(Element),
    Disconnected,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Wait after an update poll that came back empty.
    pub idle_delay: Duration,
    /// Wait after a failed request before issuing the next one.
    pub retry_delay: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            idle_delay: Duration::from_millis(250),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Handles to a request loop running on its own thread.
pub struct RequestLoop {
    pub commands: Sender<Element>,
    pub events: Receiver<NetworkEvent>,
    pub handle: thread::JoinHandle<()>,
}

pub fn spawn_request_loop<T>(transport: T, config: LoopConfig) -> RequestLoop
where
    T: Transport + Send + 'static,
{
    let (commands_tx, commands_rx) = crossbeam_channel::unbounded();
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let handle = thread::spawn(move || {
        run_request_loop(transport, commands_rx, events_tx.clone(), config);
        let _ = events_tx.send(NetworkEvent::Disconnected);
    });
    RequestLoop {
        commands: commands_tx,
        events: events_rx,
        handle,
    }
}

/// Sends queued commands, or an update poll when nothing is queued, one
/// request at a time. Returns once the command sender or the event receiver
/// goes away.
pub fn run_request_loop<T: Transport>(
    mut transport: T,
    commands: Receiver<Element>,
    events: Sender<NetworkEvent>,
    config: LoopConfig,
) {
    info!("Request loop started");
    let mut next: Option<Element> = None;

    loop {
        let request = match next.take() {
            Some(command) => command,
            None => match commands.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => RequestUpdates.to_element(),
                Err(TryRecvError::Disconnected) => break,
            },
        };
        let is_poll = request.tag == RequestUpdates::TAG;
        let markup = request.to_string();

        match transport.exchange(&markup) {
            Ok(body) if body.trim().is_empty() => {
                if is_poll {
                    // Nothing new; wake early if a command shows up.
                    match commands.recv_timeout(config.idle_delay) {
                        Ok(command) => next = Some(command),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            }
            Ok(body) => match Element::parse(&body) {
                Ok(doc) => {
                    debug!(tag = %doc.tag, "Received response");
                    if events.send(NetworkEvent::Response(doc)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(?err, len = body.len(), "Discarding unreadable response");
                }
            },
            Err(err) => {
                warn!(?err, request = %request.tag, "Request failed");
                match commands.recv_timeout(config.retry_delay) {
                    Ok(command) => next = Some(command),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }
    }

    info!("Request loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use packets::client::EndTurn;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays canned outcomes and records every request it sees.
    struct ScriptedTransport {
        script: VecDeque<anyhow::Result<String>>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for ScriptedTransport {
        fn exchange(&mut self, markup: &str) -> anyhow::Result<String> {
            self.sent.lock().unwrap().push(markup.to_string());
            self.script.pop_front().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn scripted(script: Vec<anyhow::Result<String>>) -> (ScriptedTransport, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            ScriptedTransport {
                script: script.into(),
                sent: sent.clone(),
            },
            sent,
        )
    }

    fn quick() -> LoopConfig {
        LoopConfig {
            idle_delay: Duration::from_millis(1),
            retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn queued_commands_go_out_in_order() {
        let (transport, sent) = scripted(vec![Ok("<lobby/>".into()), Ok(String::new())]);
        let (commands_tx, commands_rx) = crossbeam_channel::unbounded();
        let (events_tx, events_rx) = crossbeam_channel::unbounded();

        commands_tx.send(EndTurn { skip: true }.to_element()).unwrap();
        commands_tx.send(RequestUpdates.to_element()).unwrap();
        drop(commands_tx);

        run_request_loop(transport, commands_rx, events_tx, quick());

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            ["<end_turn skip=\"yes\"/>", "<request_updates/>"]
        );
        let Ok(NetworkEvent::Response(doc)) = events_rx.try_recv() else {
            panic!("expected a response event");
        };
        assert_eq!(doc.tag, "lobby");
        assert!(events_rx.try_recv().is_err());
    }

    #[test]
    fn polls_when_idle_and_survives_failures() {
        let (transport, sent) = scripted(vec![
            Err(anyhow!("connection refused")),
            Ok("not markup".into()),
            Ok("<death_anim x=\"1\" y=\"2\"/>".into()),
        ]);

        let handles = spawn_request_loop(transport, quick());
        let event = handles
            .events
            .recv_timeout(Duration::from_secs(5))
            .expect("loop should deliver the death animation");
        let NetworkEvent::Response(doc) = event else {
            panic!("expected a response");
        };
        assert_eq!(doc.tag, "death_anim");

        drop(handles.commands);
        handles.handle.join().unwrap();

        let sent = sent.lock().unwrap();
        assert!(sent.len() >= 3);
        assert!(sent.iter().all(|s| s == "<request_updates/>"));
    }
}
