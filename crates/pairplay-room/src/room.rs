//! A single room: who is in it, who hosts it, and who plays which side.

use pairplay_protocol::{PlayerId, Role, RoleMap, RoomCode};

use crate::config::MAX_PLAYERS;

/// A live room.
///
/// Fields are private so the invariants hold no matter who holds a
/// `&Room`:
///
/// - `players` has 1 or 2 entries, in join order;
/// - `roles` has exactly one entry per player, and two players never
///   share a role;
/// - `host` is always one of `players`.
///
/// Only the [`RoomRegistry`](crate::RoomRegistry) can mutate a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    code: RoomCode,
    host: PlayerId,
    players: Vec<PlayerId>,
    roles: RoleMap,
}

impl Room {
    /// Creates a room with `creator` as its only player, host, and White.
    pub(crate) fn new(code: RoomCode, creator: PlayerId) -> Self {
        Self {
            code,
            host: creator,
            players: vec![creator],
            roles: RoleMap::from([(creator, Role::White)]),
        }
    }

    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// The member currently treated as host.
    pub fn host(&self) -> PlayerId {
        self.host
    }

    /// Members in join order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Every member's role.
    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    /// The role `player` holds here, if they are a member.
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        self.roles.get(&player).copied()
    }

    /// Returns `true` if `player` is a member.
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Returns `true` if no seat is free.
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// The other member, if `player` has one.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.players.iter().copied().find(|p| *p != player)
    }

    /// Seats `player` in the free role and returns it.
    ///
    /// The free role is the opposite of the seated member's, which is
    /// Black unless a swap happened before the previous opponent left.
    /// Caller checks `is_full()` first.
    pub(crate) fn seat(&mut self, player: PlayerId) -> Role {
        let role = self
            .players
            .first()
            .and_then(|p| self.roles.get(p))
            .map_or(Role::White, |taken| taken.opposite());
        self.players.push(player);
        self.roles.insert(player, role);
        role
    }

    /// Exchanges every member's role.
    pub(crate) fn swap_roles(&mut self) {
        for role in self.roles.values_mut() {
            *role = role.opposite();
        }
    }

    /// Removes `player` and their role. If they were host, the first
    /// remaining member takes over. Returns `false` if `player` wasn't
    /// a member.
    pub(crate) fn unseat(&mut self, player: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| *p != player);
        if self.players.len() == before {
            return false;
        }
        self.roles.remove(&player);

        if self.host == player {
            if let Some(next) = self.players.first() {
                self.host = *next;
            }
        }
        true
    }

    /// Returns `true` once the last member has left.
    pub(crate) fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
