//! A fixed-capacity byte accumulator holding exactly one MD5 input block.

use crate::error::{Error, Result};

/// Size of one MD5 block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// A (partially filled) block of up to 64 bytes.
///
/// Blocks only grow. Every append is capacity checked and an append that does
/// not fit fails with [`Error::CapacityViolation`] without touching the block.
#[derive(Clone)]
pub struct Block {
    data: [u8; BLOCK_SIZE],
    len: usize,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            data: [0u8; BLOCK_SIZE],
            len: 0,
        }
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.len)
            .field("data", &self.as_bytes())
            .finish()
    }
}

impl Block {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single byte.
    pub fn append_byte(&mut self, byte: u8) -> Result<()> {
        self.check_room(1)?;
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Appends all of `bytes`, or nothing at all if they do not fit.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_room(bytes.len())?;
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes still available before the block is full.
    pub fn remaining(&self) -> usize {
        BLOCK_SIZE - self.len
    }

    /// The bytes appended so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    fn check_room(&self, additional: usize) -> Result<()> {
        if additional > self.remaining() {
            return Err(Error::CapacityViolation {
                len: self.len,
                additional,
                capacity: BLOCK_SIZE,
            });
        }
        Ok(())
    }
}
