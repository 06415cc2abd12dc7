/// Message pool: the descriptions revealed when robot touches a bogus item.
///
/// Slots 0 and 1 belong to robot and kitten. They hold empty sentinels,
/// never move during shuffling, and are never shown.

use rand::Rng;

use super::entity::BOGUS;
use crate::error::{GameError, GameResult};

#[derive(Clone, Debug)]
pub struct MessagePool {
    messages: Vec<String>,
}

impl MessagePool {
    /// Build a pool from raw corpus lines. Fails on an empty corpus.
    pub fn new<I, S>(raw: I) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut messages = vec![String::new(); BOGUS];
        messages.extend(raw.into_iter().map(Into::into));
        if messages.len() == BOGUS {
            return Err(GameError::EmptyCorpus);
        }
        Ok(MessagePool { messages })
    }

    /// Uniform in-place shuffle of the non-sentinel slots.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.messages.len();
        if len < BOGUS + 2 {
            return;
        }
        for i in BOGUS..len - 1 {
            let j = rng.gen_range(i..len);
            if i != j {
                self.messages.swap(i, j);
            }
        }
    }

    /// Message for a pool slot. Sentinels and out-of-range slots read as "".
    pub fn message_at(&self, index: usize) -> &str {
        if index < BOGUS {
            return "";
        }
        self.messages.get(index).map(String::as_str).unwrap_or("")
    }

    /// Total slots, sentinels included.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// How many decoys this pool can describe.
    pub fn capacity(&self) -> usize {
        self.messages.len() - BOGUS
    }

    #[cfg(test)]
    pub fn descriptions(&self) -> &[String] {
        &self.messages[BOGUS..]
    }
}
