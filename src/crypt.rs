//! DISCLAIMER: MD5-crypt is a legacy scheme. It is here to verify and recover old `$1$`
//! credentials, not to protect new ones. Use a modern password hash for anything new.

pub mod block;
pub mod encode;
pub mod md5;
pub mod password;

pub use block::{Block, BLOCK_SIZE};
pub use encode::{encode_digest, EncodedHash, ALPHABET, HASH_LENGTH};
pub use md5::{md5_hash, Digest, MD5_OUTPUT_SIZE};
pub use password::{crypt, hash_password, verify, Salt, MAGIC, MAX_PASSWORD_LEN, ROUNDS, SALT_LENGTH};
