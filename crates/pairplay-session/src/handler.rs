//! The session handler: how the relay reacts to each client event.
//!
//! Every reaction is a synchronous function of (registry, event) that
//! returns the events to emit as `(Recipient, ServerEvent)` pairs, the
//! same shape a room actor would hand to its dispatcher. Nothing here
//! does I/O; the server sends what comes back.

use std::collections::HashSet;

use pairplay_protocol::{
    Action, ClientEvent, PlayerId, Recipient, Role, RoomCode, ServerEvent,
};
use pairplay_room::{
    CodeSource, RandomCodes, Removal, RoomConfig, RoomError, RoomRegistry,
};

use crate::{Delivery, SessionState};

/// Events to emit, in order, with who they are for.
pub type Outbox = Vec<(Recipient, ServerEvent)>;

/// Reacts to connection events against an owned [`RoomRegistry`].
///
/// One handler serves every connection. Callers must not interleave
/// calls: hold it behind a single lock (or inside one task) and deliver
/// each returned [`Outbox`] before the next call, so every room sees one
/// order of events.
pub struct SessionHandler<S: CodeSource = RandomCodes> {
    registry: RoomRegistry<S>,

    /// Connections between `connect()` and `disconnect()`.
    connected: HashSet<PlayerId>,
}

impl SessionHandler<RandomCodes> {
    /// Creates a handler with a fresh registry generating random codes.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_registry(RoomRegistry::new(config))
    }
}

impl<S: CodeSource> SessionHandler<S> {
    /// Creates a handler around an existing registry.
    pub fn with_registry(registry: RoomRegistry<S>) -> Self {
        Self {
            registry,
            connected: HashSet::new(),
        }
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &RoomRegistry<S> {
        &self.registry
    }

    /// Where `player` stands right now.
    pub fn state_of(&self, player: PlayerId) -> SessionState {
        if !self.connected.contains(&player) {
            return SessionState::Disconnected;
        }
        match self.registry.find_room_for(player) {
            None => SessionState::Unassigned,
            Some(code) => match self.registry.get(&code) {
                Some(room) if room.host() == player => SessionState::Hosting(code),
                _ => SessionState::Joined(code),
            },
        }
    }

    /// Registers a new connection and greets it with its id.
    pub fn connect(&mut self, player: PlayerId) -> Outbox {
        self.connected.insert(player);
        vec![(
            Recipient::Player(player),
            ServerEvent::Connected { player_id: player },
        )]
    }

    /// Reacts to one event from a connected player.
    ///
    /// Events from connections that aren't registered are dropped.
    pub fn handle(&mut self, player: PlayerId, event: ClientEvent) -> Outbox {
        if !self.connected.contains(&player) {
            tracing::debug!(%player, "event from unknown connection, ignoring");
            return Vec::new();
        }

        match event {
            ClientEvent::CreateRoom => self.create_room(player),
            ClientEvent::JoinRoom(code) => self.join_room(player, code),
            ClientEvent::Action { room_code, action } => {
                self.relay_action(player, room_code, action)
            }
            ClientEvent::LeaveRoom(code) => self.leave_room(player, code),
        }
    }

    /// Tears down a connection: leaves its room (if any) and tells the
    /// remaining member. Unknown connections are a no-op.
    pub fn disconnect(&mut self, player: PlayerId) -> Outbox {
        self.connected.remove(&player);

        let Some(code) = self.registry.find_room_for(player) else {
            return Vec::new();
        };
        match self.registry.remove_player(&code, player) {
            Ok(removal) => opponent_left(&code, removal),
            Err(e) => {
                tracing::debug!(%player, error = %e, "disconnect cleanup failed");
                Vec::new()
            }
        }
    }

    /// Expands room broadcasts into one delivery per current member.
    ///
    /// Call right after the `handle`/`connect`/`disconnect` call that
    /// produced `outbox`, before the registry changes again.
    pub fn route(&self, outbox: Outbox) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(outbox.len() * 2);
        for (recipient, event) in outbox {
            match recipient {
                Recipient::Player(to) => deliveries.push(Delivery { to, event }),
                Recipient::Room(code) => {
                    for to in self.registry.members(&code) {
                        deliveries.push(Delivery {
                            to: *to,
                            event: event.clone(),
                        });
                    }
                }
            }
        }
        deliveries
    }

    // -- Event reactions ------------------------------------------------

    fn create_room(&mut self, player: PlayerId) -> Outbox {
        match self.registry.create(player) {
            Ok(room_code) => vec![(
                Recipient::Player(player),
                ServerEvent::RoomCreated {
                    room_code,
                    role: Role::White,
                },
            )],
            Err(e) => reject(player, &e),
        }
    }

    fn join_room(&mut self, player: PlayerId, code: RoomCode) -> Outbox {
        let roles = match self.registry.join(&code, player) {
            Ok(roles) => roles,
            Err(e) => return reject(player, &e),
        };
        let Some(room) = self.registry.get(&code) else {
            return Vec::new();
        };
        let (host, role) = (room.host(), room.role_of(player));

        let mut out = Vec::with_capacity(3);
        if let Some(role) = role {
            out.push((
                Recipient::Player(player),
                ServerEvent::RoomJoined {
                    room_code: code.clone(),
                    role,
                },
            ));
        }
        out.push((
            Recipient::Player(host),
            ServerEvent::OpponentJoined {
                room_code: code.clone(),
            },
        ));
        out.push((
            Recipient::Room(code.clone()),
            ServerEvent::RoomReady {
                room_code: code,
                roles,
            },
        ));
        out
    }

    fn relay_action(
        &mut self,
        player: PlayerId,
        code: RoomCode,
        action: Action,
    ) -> Outbox {
        // Non-members learn nothing, not even whether the room exists.
        if !self.registry.is_member(&code, player) {
            tracing::debug!(%player, room_code = %code, "action from non-member, ignoring");
            return Vec::new();
        }

        match action {
            Action::SwapSides => match self.registry.swap_roles(&code) {
                Ok(roles) => vec![
                    (
                        Recipient::Room(code.clone()),
                        ServerEvent::RolesUpdated {
                            room_code: code.clone(),
                            roles,
                        },
                    ),
                    (
                        Recipient::Room(code),
                        ServerEvent::Action(Action::restart()),
                    ),
                ],
                Err(e) => reject(player, &e),
            },
            relayed @ Action::Relay(_) => {
                vec![(Recipient::Room(code), ServerEvent::Action(relayed))]
            }
        }
    }

    fn leave_room(&mut self, player: PlayerId, code: RoomCode) -> Outbox {
        if !self.registry.is_member(&code, player) {
            tracing::debug!(%player, room_code = %code, "leave from non-member, ignoring");
            return Vec::new();
        }
        match self.registry.remove_player(&code, player) {
            Ok(removal) => {
                let mut out = vec![(
                    Recipient::Player(player),
                    ServerEvent::RoomLeft {
                        room_code: code.clone(),
                    },
                )];
                out.extend(opponent_left(&code, removal));
                out
            }
            Err(e) => reject(player, &e),
        }
    }
}

/// Tells the requester why its request failed.
fn reject(player: PlayerId, error: &RoomError) -> Outbox {
    tracing::debug!(%player, %error, "request rejected");
    vec![(
        Recipient::Player(player),
        ServerEvent::RoomError(error.to_string()),
    )]
}

/// Notifies whoever is left after a departure.
fn opponent_left(code: &RoomCode, removal: Removal) -> Outbox {
    match removal.remaining {
        Some(remaining) => vec![(
            Recipient::Player(remaining),
            ServerEvent::OpponentLeft {
                room_code: code.clone(),
            },
        )],
        None => Vec::new(),
    }
}
