//! The MD5-crypt (`$1$`) password hash.
//!
//! Three chained stages, every one of them a single-block MD5:
//! - the alternate hash of `password ++ salt ++ password`;
//! - the first intermediate hash, which mixes in the magic, the salt, a prefix
//!   of the alternate hash and the password length bits;
//! - [`ROUNDS`] further intermediate hashes, each depending on the previous one.
//!
//! The final intermediate hash is then encoded into 22 printable characters.

use super::block::Block;
use super::encode::{encode_digest, EncodedHash};
use super::md5::{md5_hash, Digest};
use crate::error::{Error, Result};
use log::trace;
use std::fmt;
use std::str::FromStr;

/// Required length of the salt.
pub const SALT_LENGTH: usize = 8;

/// Longest password whose rounds still fit in a single MD5 block.
pub const MAX_PASSWORD_LEN: usize = 15;

/// Number of chained intermediate rounds after the first intermediate hash.
pub const ROUNDS: usize = 1000;

/// Marker identifying the scheme, both in hash strings and in the first intermediate hash.
pub const MAGIC: &str = "$1$";

/// An 8-byte printable salt.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Salt(String);

impl Salt {
    /// Validates and wraps a salt. It must be exactly 8 printable ASCII bytes,
    /// none of which is `$`.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SALT_LENGTH {
            return Err(Error::InvalidSalt {
                reason: format!("expected {SALT_LENGTH} bytes, got {}", bytes.len()),
            });
        }
        if let Some(&bad) = bytes.iter().find(|&&b| !b.is_ascii_graphic() || b == b'$') {
            return Err(Error::InvalidSalt {
                reason: format!("byte {bad:#04x} is not allowed"),
            });
        }
        let salt = std::str::from_utf8(bytes).map_err(|e| Error::InvalidSalt {
            reason: e.to_string(),
        })?;
        Ok(Salt(salt.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&[u8]> for Salt {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Salt::new(bytes)
    }
}

impl FromStr for Salt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Salt::new(s.as_bytes())
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({:?})", self.as_str())
    }
}

/// Digest of `password ++ salt ++ password`.
fn alternate_hash(password: &[u8], salt: &Salt) -> Result<Digest> {
    let mut block = Block::new();
    block.append_bytes(password)?;
    block.append_bytes(salt.as_bytes())?;
    block.append_bytes(password)?;
    md5_hash(block)
}

/// Digest seeding the round loop.
///
/// After the first `password.len()` bytes of the alternate hash, the password
/// length is walked bit by bit from the bottom: an even length appends the
/// first password byte, an odd one a zero byte.
fn first_intermediate(password: &[u8], salt: &Salt, alt_hash: &Digest) -> Result<Digest> {
    let mut block = Block::new();
    block.append_bytes(password)?;
    block.append_bytes(MAGIC.as_bytes())?;
    block.append_bytes(salt.as_bytes())?;
    block.append_bytes(&alt_hash[..password.len().min(alt_hash.len())])?;

    let mut n = password.len();
    while n > 0 {
        if n & 1 == 0 {
            block.append_byte(password[0])?;
        } else {
            block.append_byte(0)?;
        }
        n >>= 1;
    }
    md5_hash(block)
}

/// Intermediate round `inum`, replacing `int_hash` with the next digest.
fn next_intermediate(password: &[u8], salt: &Salt, inum: usize, int_hash: &Digest) -> Result<Digest> {
    let mut block = Block::new();
    if inum % 2 == 0 {
        block.append_bytes(int_hash)?;
    } else {
        block.append_bytes(password)?;
    }
    if inum % 3 != 0 {
        block.append_bytes(salt.as_bytes())?;
    }
    if inum % 7 != 0 {
        block.append_bytes(password)?;
    }
    if inum % 2 == 0 {
        block.append_bytes(password)?;
    } else {
        block.append_bytes(int_hash)?;
    }
    md5_hash(block)
}

/// Computes the 22-character MD5-crypt hash of `password` under `salt`.
///
/// Passwords longer than [`MAX_PASSWORD_LEN`] bytes do not fit the single-block
/// MD5 and fail with [`Error::CapacityViolation`]; the result is never truncated.
pub fn hash_password(password: &[u8], salt: &Salt) -> Result<EncodedHash> {
    let alt_hash = alternate_hash(password, salt)?;
    trace!("alternate hash for salt {salt} computed");

    let mut int_hash = first_intermediate(password, salt, &alt_hash)?;
    for inum in 0..ROUNDS {
        int_hash = next_intermediate(password, salt, inum, &int_hash)?;
    }
    trace!("{ROUNDS} intermediate rounds for salt {salt} done");

    Ok(encode_digest(&int_hash))
}

/// Full `$1$<salt>$<hash>` string for `password`.
pub fn crypt(password: &[u8], salt: &Salt) -> Result<String> {
    let hash = hash_password(password, salt)?;
    Ok(format!("{MAGIC}{salt}${hash}"))
}

/// Whether `password` hashes to `expected` under `salt`.
pub fn verify(password: &[u8], salt: &Salt, expected: &str) -> Result<bool> {
    Ok(hash_password(password, salt)? == *expected)
}
