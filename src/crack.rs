pub mod attack;
pub mod dictionary;
pub mod shadow;

pub use attack::{AttackConfig, AttackSummary, DictionaryAttack, Match};
pub use dictionary::{Dictionary, DICTIONARY_LIMIT};
pub use shadow::{InvalidRecordPolicy, ShadowFile, ShadowRecord, USERNAME_LIMIT};
