pub mod crack;
pub mod crypt;
pub mod error;

pub use crack::{
    AttackConfig, AttackSummary, Dictionary, DictionaryAttack, InvalidRecordPolicy, Match,
    ShadowFile, ShadowRecord,
};
pub use crypt::{crypt, hash_password, verify, EncodedHash, Salt};
pub use error::{Error, Result};
