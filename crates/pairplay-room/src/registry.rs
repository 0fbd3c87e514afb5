//! The room registry: creates, tracks, mutates, and deletes rooms.

use std::collections::HashMap;

use pairplay_protocol::{PlayerId, RoleMap, RoomCode};

use crate::{CodeSource, RandomCodes, Room, RoomConfig, RoomError};

/// What happened to a room when a player was removed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The member still in the room, if any.
    pub remaining: Option<PlayerId>,

    /// `true` if the room was deleted because it became empty.
    pub deleted: bool,

    /// The remaining member, if they just became host.
    pub promoted: Option<PlayerId>,
}

/// Owns every live [`Room`], keyed by code.
///
/// The registry is plain data with no I/O and no locking. It is owned by
/// one task (or one mutex) at a higher level, and every method runs to
/// completion before the next is called, so each operation is atomic
/// with respect to the others.
///
/// ## Lifecycle of a room
///
/// ```text
/// create() ──→ [1 player] ──join()──→ [2 players] ──swap_roles()──┐
///                  ↑                        │  ↑                  │
///                  └────remove_player()─────┘  └──────────────────┘
///                  │
///                  └──remove_player()──→ deleted
/// ```
pub struct RoomRegistry<S: CodeSource = RandomCodes> {
    /// Live rooms, keyed by normalized code.
    rooms: HashMap<RoomCode, Room>,

    /// Maps each player to the room they're in. A player is in at most
    /// ONE room at a time. Updated together with every membership change,
    /// so looking up a player's room never scans `rooms`.
    player_rooms: HashMap<PlayerId, RoomCode>,

    /// Where new room codes come from.
    codes: S,
}

impl RoomRegistry<RandomCodes> {
    /// Creates an empty registry that generates random codes.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_code_source(RandomCodes::new(config.code_length))
    }
}

impl Default for RoomRegistry<RandomCodes> {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl<S: CodeSource> RoomRegistry<S> {
    /// Creates an empty registry that draws codes from `codes`.
    pub fn with_code_source(codes: S) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            codes,
        }
    }

    /// Creates a room hosted by `creator`, who plays White.
    ///
    /// Draws codes until one is free. There is no retry cap: the code
    /// space is much larger than the number of live rooms.
    ///
    /// # Errors
    /// [`RoomError::AlreadyInRoom`] if `creator` is already a member of
    /// some room.
    pub fn create(&mut self, creator: PlayerId) -> Result<RoomCode, RoomError> {
        if let Some(current) = self.player_rooms.get(&creator) {
            return Err(RoomError::AlreadyInRoom(creator, current.clone()));
        }

        let code = loop {
            let candidate = self.codes.next_code();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!(room_code = %candidate, "room code collision, retrying");
        };

        self.rooms
            .insert(code.clone(), Room::new(code.clone(), creator));
        self.player_rooms.insert(creator, code.clone());

        tracing::info!(room_code = %code, host = %creator, "room created");
        Ok(code)
    }

    /// Seats `joiner` as the second player of `code`'s room.
    ///
    /// Returns the room's full role map after the join.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if `joiner` is already in a room.
    /// - [`RoomError::Unavailable`] if the room doesn't exist or is full.
    ///
    /// On error the registry is unchanged.
    pub fn join(
        &mut self,
        code: &RoomCode,
        joiner: PlayerId,
    ) -> Result<RoleMap, RoomError> {
        if let Some(current) = self.player_rooms.get(&joiner) {
            return Err(RoomError::AlreadyInRoom(joiner, current.clone()));
        }

        let room = self
            .rooms
            .get_mut(code)
            .filter(|room| !room.is_full())
            .ok_or_else(|| RoomError::Unavailable(code.clone()))?;

        let role = room.seat(joiner);
        self.player_rooms.insert(joiner, code.clone());

        tracing::info!(
            room_code = %code,
            player_id = %joiner,
            %role,
            players = room.players().len(),
            "player joined"
        );
        Ok(room.roles().clone())
    }

    /// Returns the code of the room `player` is in, if any.
    pub fn find_room_for(&self, player: PlayerId) -> Option<RoomCode> {
        self.player_rooms.get(&player).cloned()
    }

    /// Exchanges the roles of the two members of `code`'s room.
    ///
    /// Pure state change: notifying clients is the caller's job.
    ///
    /// # Errors
    /// [`RoomError::SwapIneligible`] if the room doesn't exist or doesn't
    /// have exactly two players. The room is left untouched.
    pub fn swap_roles(&mut self, code: &RoomCode) -> Result<RoleMap, RoomError> {
        let room = self
            .rooms
            .get_mut(code)
            .filter(|room| room.is_full())
            .ok_or_else(|| RoomError::SwapIneligible(code.clone()))?;

        room.swap_roles();
        tracing::info!(room_code = %code, "sides swapped");
        Ok(room.roles().clone())
    }

    /// Removes `player` from `code`'s room.
    ///
    /// Deletes the room if it becomes empty; otherwise promotes the
    /// remaining member to host if `player` was host.
    ///
    /// # Errors
    /// [`RoomError::NotInRoom`] if `player` isn't a member of that room
    /// (including when the room doesn't exist).
    pub fn remove_player(
        &mut self,
        code: &RoomCode,
        player: PlayerId,
    ) -> Result<Removal, RoomError> {
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotInRoom(player, code.clone()))?;

        let was_host = room.host() == player;
        if !room.unseat(player) {
            return Err(RoomError::NotInRoom(player, code.clone()));
        }
        self.player_rooms.remove(&player);

        tracing::info!(
            room_code = %code,
            player_id = %player,
            players = room.players().len(),
            "player left"
        );

        if room.is_empty() {
            self.rooms.remove(code);
            tracing::info!(room_code = %code, "room destroyed");
            return Ok(Removal {
                remaining: None,
                deleted: true,
                promoted: None,
            });
        }

        let remaining = room.players().first().copied();
        let promoted = if was_host {
            tracing::info!(room_code = %code, host = %room.host(), "host reassigned");
            Some(room.host())
        } else {
            None
        };

        Ok(Removal {
            remaining,
            deleted: false,
            promoted,
        })
    }

    /// Looks up a room by code.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Returns `true` if `player` is a member of `code`'s room.
    pub fn is_member(&self, code: &RoomCode, player: PlayerId) -> bool {
        self.player_rooms.get(&player) == Some(code)
    }

    /// Members of `code`'s room in join order; empty if it doesn't exist.
    pub fn members(&self, code: &RoomCode) -> &[PlayerId] {
        self.rooms
            .get(code)
            .map(Room::players)
            .unwrap_or_default()
    }

    /// Returns the number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if there are no live rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
