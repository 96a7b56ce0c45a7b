//! Shadow-style credential records: `username:$1$salt$hash`.
//!
//! Only the MD5-crypt scheme is understood. The hash ends at the next `:` or
//! space; anything after it (`:lastchg:min:...` in a real shadow file) is ignored.

use crate::crypt::{Salt, HASH_LENGTH, MAGIC, SALT_LENGTH};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Maximum username length.
pub const USERNAME_LIMIT: usize = 32;

/// One parsed credential line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRecord {
    pub username: String,
    pub salt: Salt,
    pub hash: String,
}

impl ShadowRecord {
    /// Parses a single line. `line_no` only goes into error messages.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedRecord {
            line: line_no,
            reason: reason.to_string(),
        };

        let (username, rest) = line
            .split_once(':')
            .ok_or_else(|| malformed("missing ':' after username"))?;
        if username.is_empty() || username.len() > USERNAME_LIMIT || username.contains(' ') {
            return Err(malformed("username must be 1 to 32 characters without spaces"));
        }

        let rest = rest
            .strip_prefix(MAGIC)
            .ok_or_else(|| malformed("hash does not start with $1$"))?;

        let (salt, rest) = rest
            .split_once('$')
            .ok_or_else(|| malformed("missing '$' after salt"))?;
        if salt.len() != SALT_LENGTH || salt.contains(' ') {
            return Err(malformed("salt must be exactly 8 characters"));
        }
        let salt = Salt::from_str(salt).map_err(|e| malformed(&e.to_string()))?;

        let hash = rest.split([':', ' ']).next().unwrap_or_default();
        if hash.len() != HASH_LENGTH {
            return Err(malformed("hash must be exactly 22 characters"));
        }

        Ok(Self {
            username: username.to_string(),
            salt,
            hash: hash.to_string(),
        })
    }
}

impl FromStr for ShadowRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 1)
    }
}

/// What to do with a line that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidRecordPolicy {
    /// Stop reading and report the error.
    #[default]
    Abort,
    /// Log a warning and continue with the next line.
    Skip,
}

/// All usable records of a shadow file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowFile {
    pub records: Vec<ShadowRecord>,
    /// Lines dropped under [`InvalidRecordPolicy::Skip`].
    pub skipped: usize,
}

impl ShadowFile {
    pub fn parse<R: BufRead>(reader: R, policy: InvalidRecordPolicy) -> Result<Self> {
        let mut shadow = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| Error::MalformedRecord {
                line: line_no,
                reason: e.to_string(),
            })?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() {
                continue;
            }

            match ShadowRecord::parse(line, line_no) {
                Ok(record) => shadow.records.push(record),
                Err(e) if policy == InvalidRecordPolicy::Skip => {
                    warn!("skipping record: {e}");
                    shadow.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(shadow)
    }

    pub fn load(path: impl AsRef<Path>, policy: InvalidRecordPolicy) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let shadow = Self::parse(BufReader::new(file), policy)?;
        debug!(
            "loaded {} records from {} ({} skipped)",
            shadow.records.len(),
            path.display(),
            shadow.skipped
        );
        Ok(shadow)
    }
}
