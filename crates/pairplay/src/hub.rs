//! The hub: session handler plus one outbound queue per connection.
//!
//! Everything a client event changes (registry state and the messages it
//! causes) happens inside one `&mut Hub` call. The server keeps the hub
//! behind a single lock, so while one event is being handled no other
//! event can touch the registry, and the resulting messages are queued
//! before the lock is released. Each connection's writer task drains its
//! queue in order, so both members of a room observe the same sequence.

use std::collections::HashMap;

use pairplay_protocol::{ClientEvent, PlayerId, ServerEvent};
use pairplay_room::CodeSource;
use pairplay_session::{Outbox, SessionHandler};
use tokio::sync::mpsc::UnboundedSender;

pub(crate) struct Hub<S: CodeSource> {
    handler: SessionHandler<S>,
    peers: HashMap<PlayerId, UnboundedSender<ServerEvent>>,
}

impl<S: CodeSource> Hub<S> {
    pub(crate) fn new(handler: SessionHandler<S>) -> Self {
        Self {
            handler,
            peers: HashMap::new(),
        }
    }

    /// Registers a connection's outbound queue and greets it.
    pub(crate) fn attach(
        &mut self,
        player: PlayerId,
        outbound: UnboundedSender<ServerEvent>,
    ) {
        self.peers.insert(player, outbound);
        let outbox = self.handler.connect(player);
        self.deliver(outbox);
    }

    /// Handles one client event and queues what it causes.
    pub(crate) fn dispatch(&mut self, player: PlayerId, event: ClientEvent) {
        let outbox = self.handler.handle(player, event);
        self.deliver(outbox);
    }

    /// Runs the disconnect path. Dropping the sender ends the writer task.
    pub(crate) fn detach(&mut self, player: PlayerId) {
        self.peers.remove(&player);
        let outbox = self.handler.disconnect(player);
        self.deliver(outbox);
    }

    /// Number of live rooms.
    pub(crate) fn room_count(&self) -> usize {
        self.handler.registry().len()
    }

    fn deliver(&self, outbox: Outbox) {
        for delivery in self.handler.route(outbox) {
            let Some(outbound) = self.peers.get(&delivery.to) else {
                continue;
            };
            if outbound.send(delivery.event).is_err() {
                tracing::debug!(player = %delivery.to, "outbound queue closed, dropping event");
            }
        }
    }
}
