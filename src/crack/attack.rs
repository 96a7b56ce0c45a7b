//! Dictionary attack: hash every candidate word with each record's salt and
//! report the words whose hash matches the stored one.
//!
//! A single hash is a strictly sequential chain of rounds, but different words
//! are independent, so with the `parallel` feature the words of a record are
//! spread over a rayon pool. Results always come back in dictionary order.

use super::dictionary::Dictionary;
use super::shadow::ShadowRecord;
use crate::crypt::hash_password;
use crate::error::Result;
use log::{debug, info};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A cracked credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub username: String,
    pub password: String,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.username, self.password)
    }
}

/// Knobs for [`DictionaryAttack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackConfig {
    /// Hash words concurrently. Ignored without the `parallel` feature.
    pub parallel: bool,
    /// Worker threads; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            jobs: None,
        }
    }
}

impl AttackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }
}

/// Counters for one attack run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackSummary {
    pub records: usize,
    pub words: usize,
    pub hashes: usize,
    pub matches: usize,
}

impl fmt::Display for AttackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records x {} words: {} hashes, {} matches",
            self.records, self.words, self.hashes, self.matches
        )
    }
}

pub struct DictionaryAttack<'d> {
    dictionary: &'d Dictionary,
    config: AttackConfig,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<'d> DictionaryAttack<'d> {
    pub fn new(dictionary: &'d Dictionary, config: AttackConfig) -> Result<Self> {
        #[cfg(feature = "parallel")]
        let pool = match config.jobs {
            Some(jobs) if config.parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()?,
            ),
            _ => None,
        };

        Ok(Self {
            dictionary,
            config,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Tries every dictionary word against one record, returning the matches in
    /// dictionary order.
    pub fn crack_record(&self, record: &ShadowRecord) -> Result<Vec<Match>> {
        debug!("cracking {} against {} words", record.username, self.dictionary.len());
        let hits = self.hash_all(record)?;

        Ok(self
            .dictionary
            .iter()
            .zip(hits)
            .filter(|(_, hit)| *hit)
            .map(|(word, _)| Match {
                username: record.username.clone(),
                password: word.to_string(),
            })
            .collect())
    }

    /// Cracks every record in order.
    pub fn run(&self, records: &[ShadowRecord]) -> Result<Vec<Match>> {
        self.run_with_summary(records).map(|(matches, _)| matches)
    }

    pub fn run_with_summary(&self, records: &[ShadowRecord]) -> Result<(Vec<Match>, AttackSummary)> {
        let mut matches = Vec::new();
        for record in records {
            for found in self.crack_record(record)? {
                info!("cracked {}", found.username);
                matches.push(found);
            }
        }

        let summary = AttackSummary {
            records: records.len(),
            words: self.dictionary.len(),
            hashes: records.len() * self.dictionary.len(),
            matches: matches.len(),
        };
        info!("{summary}");
        Ok((matches, summary))
    }

    /// One flag per dictionary word: does it hash to the record's stored hash?
    fn hash_all(&self, record: &ShadowRecord) -> Result<Vec<bool>> {
        if self.config.parallel {
            self.hash_all_parallel(record)
        } else {
            self.dictionary.words().iter().map(|w| is_hit(w, record)).collect()
        }
    }

    #[cfg(feature = "parallel")]
    fn hash_all_parallel(&self, record: &ShadowRecord) -> Result<Vec<bool>> {
        let words = self.dictionary.words();
        let run = || {
            words
                .par_iter()
                .map(|w| is_hit(w, record))
                .collect::<Result<Vec<_>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn hash_all_parallel(&self, record: &ShadowRecord) -> Result<Vec<bool>> {
        self.dictionary.words().iter().map(|w| is_hit(w, record)).collect()
    }
}

fn is_hit(word: &str, record: &ShadowRecord) -> Result<bool> {
    Ok(hash_password(word.as_bytes(), &record.salt)? == *record.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crack::shadow::{InvalidRecordPolicy, ShadowFile};
    use crate::error::Error;
    use std::io::Cursor;

    const ALICE: &str = "alice:$1$abcdefgh$rwnEbRiN0agqVgZBovWNQ/";
    const BOB: &str = "bob:$1$12345678$xek.CpjQUVgdf/P2N9KQf/";
    const CAROL: &str = "carol:$1$saltsalt$qjXMvbEw8oaL.CzflDtaK/";

    fn dictionary(words: &[&str]) -> Dictionary {
        Dictionary::from_words(words.iter().copied()).unwrap()
    }

    #[test]
    fn test_single_record_single_match() {
        let dict = dictionary(&["world", "hello", "test"]);
        let record: ShadowRecord = ALICE.parse().unwrap();

        for config in [AttackConfig::new().parallel(false), AttackConfig::new()] {
            let attack = DictionaryAttack::new(&dict, config).unwrap();
            let matches = attack.crack_record(&record).unwrap();
            assert_eq!(
                matches,
                vec![Match {
                    username: "alice".to_string(),
                    password: "hello".to_string()
                }]
            );
            assert_eq!(matches[0].to_string(), "alice : hello");
        }
    }

    #[test]
    fn test_run_over_shadow_file() {
        let dict = dictionary(&["password", "hello", "letmein"]);
        let input = format!("{ALICE}\n{BOB}\n{CAROL}\n");
        let shadow = ShadowFile::parse(Cursor::new(input), InvalidRecordPolicy::Abort).unwrap();

        let attack = DictionaryAttack::new(&dict, AttackConfig::new().jobs(2)).unwrap();
        let (matches, summary) = attack.run_with_summary(&shadow.records).unwrap();

        let found: Vec<_> = matches.iter().map(ToString::to_string).collect();
        assert_eq!(found, vec!["alice : hello", "carol : password"]);
        assert_eq!(
            summary,
            AttackSummary {
                records: 3,
                words: 3,
                hashes: 9,
                matches: 2
            }
        );
    }

    #[test]
    fn test_empty_password_record() {
        // bob's password is the empty string, which only an unvalidated word list can hold
        let dict = Dictionary::unchecked(&["nope", ""]);
        let record: ShadowRecord = BOB.parse().unwrap();
        let attack = DictionaryAttack::new(&dict, AttackConfig::default()).unwrap();
        let matches = attack.crack_record(&record).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].password, "");
    }

    #[test]
    fn test_no_matches() {
        let dict = dictionary(&["a", "b"]);
        let attack = DictionaryAttack::new(&dict, AttackConfig::default()).unwrap();
        assert!(attack.run(&[ALICE.parse().unwrap()]).unwrap().is_empty());
    }

    #[test]
    fn test_overlong_word_propagates_capacity_violation() {
        let dict = Dictionary::unchecked(&["hello", "thisiswaytoolongforoneblock"]);
        let record: ShadowRecord = ALICE.parse().unwrap();
        for config in [AttackConfig::new().parallel(false), AttackConfig::new()] {
            let attack = DictionaryAttack::new(&dict, config).unwrap();
            assert!(matches!(
                attack.crack_record(&record),
                Err(Error::CapacityViolation { .. })
            ));
        }
    }
}
