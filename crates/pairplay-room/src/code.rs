//! Room code generation.
//!
//! The registry asks a [`CodeSource`] for candidate codes and retries
//! until it gets one that isn't in use. Production uses [`RandomCodes`];
//! tests plug in a scripted source to get predictable codes.

use pairplay_protocol::RoomCode;
use rand::Rng;

/// Characters room codes are drawn from. Uppercase only, because codes
/// are normalized to uppercase everywhere else.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces candidate room codes.
///
/// Candidates need not be unique; the registry rejects ones in use and
/// asks again. `Send` because the registry is shared across Tokio tasks
/// behind a mutex.
pub trait CodeSource: Send + 'static {
    /// Returns the next candidate code.
    fn next_code(&mut self) -> RoomCode;
}

/// Any `FnMut() -> RoomCode` closure is a code source.
impl<F> CodeSource for F
where
    F: FnMut() -> RoomCode + Send + 'static,
{
    fn next_code(&mut self) -> RoomCode {
        self()
    }
}

/// Uniformly random codes over [`CODE_ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomCodes {
    length: usize,
}

impl RandomCodes {
    /// Creates a source of codes with `length` characters.
    ///
    /// A length of 0 is raised to 1: empty codes would all collide.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> RoomCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| {
                let idx = rng.random_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect();
        RoomCode::new(code)
    }
}
