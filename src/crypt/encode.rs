//! Digest-to-text encoding used by MD5-crypt.
//!
//! The digest bytes are first shuffled into three-byte groups, then each group
//! is packed into four 6-bit codes, low bits first. The last group has a single
//! byte and yields two codes. Each code indexes [`ALPHABET`].

use super::md5::{Digest, MD5_OUTPUT_SIZE};
use std::fmt;

/// The 64 printable symbols, indexed by 6-bit code.
pub const ALPHABET: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of characters in an encoded hash.
pub const HASH_LENGTH: usize = 22;

/// `PERMUTATION[i]` is the position digest byte `i` moves to before packing.
const PERMUTATION: [usize; MD5_OUTPUT_SIZE] = [2, 5, 8, 11, 14, 12, 1, 4, 7, 10, 13, 15, 0, 3, 6, 9];

/// A 22-character MD5-crypt hash string over [`ALPHABET`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedHash(String);

impl EncodedHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedHash({:?})", self.as_str())
    }
}

impl PartialEq<str> for EncodedHash {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EncodedHash {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn permute(digest: &Digest) -> Digest {
    let mut permuted = [0u8; MD5_OUTPUT_SIZE];
    for (&byte, &to) in digest.iter().zip(PERMUTATION.iter()) {
        permuted[to] = byte;
    }
    permuted
}

/// Packs the permuted digest into 22 six-bit codes.
fn six_bit_codes(permuted: &Digest) -> [u8; HASH_LENGTH] {
    let mut codes = [0u8; HASH_LENGTH];
    let mut out = 0;

    for group in permuted.chunks(3) {
        let a = group[0] >> 6;
        let b = group[0] & 0x3F;
        match *group {
            [_, second, third] => {
                let c = second >> 4;
                let d = (second & 0x0F) << 2;
                let e = (third & 0xFC) >> 2;
                let f = (third & 0x03) << 4;
                codes[out..out + 4].copy_from_slice(&[b, a | d, c | f, e]);
                out += 4;
            }
            _ => {
                codes[out] = b;
                codes[out + 1] = a;
                out += 2;
            }
        }
    }
    debug_assert_eq!(out, HASH_LENGTH);
    codes
}

/// Encodes a digest as the 22-character MD5-crypt hash string.
pub fn encode_digest(digest: &Digest) -> EncodedHash {
    let codes = six_bit_codes(&permute(digest));
    EncodedHash(
        codes
            .iter()
            .map(|&code| char::from(ALPHABET[code as usize]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_digest_encodes_to_dots() {
        let encoded = encode_digest(&[0u8; 16]);
        assert_eq!(encoded, "......................");
        assert_eq!(encoded.as_str().len(), HASH_LENGTH);
    }

    #[test]
    fn test_all_ones_digest() {
        // every code is 63 except the final one, which only carries two bits
        let encoded = encode_digest(&[0xFF; 16]);
        assert_eq!(encoded, "zzzzzzzzzzzzzzzzzzzzz1");
    }

    #[test]
    fn test_permutation_is_a_bijection() {
        let mut seen = [false; MD5_OUTPUT_SIZE];
        for &to in PERMUTATION.iter() {
            assert!(!seen[to]);
            seen[to] = true;
        }
    }

    #[test]
    fn test_single_byte_positions() {
        // digest[12] lands first, so its low six bits become the first code
        let mut digest = [0u8; 16];
        digest[12] = 0x05;
        assert_eq!(&encode_digest(&digest).as_str()[..2], "3.");

        // digest[11] is the lone final byte: low bits second to last, top bits last
        let mut digest = [0u8; 16];
        digest[11] = 0xC1;
        let encoded = encode_digest(&digest);
        assert_eq!(&encoded.as_str()[20..], "/1");
    }

    #[test]
    fn test_group_packing() {
        let permuted: Digest = [0b1100_0001, 0b1010_0101, 0b1111_0011, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let codes = six_bit_codes(&permuted);
        // b = 000001, a|d = 3 | 0101<<2, c|f = 1010 | 11<<4, e = 111100
        assert_eq!(&codes[..4], &[0x01, 0x17, 0x3A, 0x3C]);
        assert!(codes[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_random_digests_encode_to_22_symbols() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        for _ in 0..256 {
            let digest: Digest = rng.gen();
            let encoded = encode_digest(&digest);
            assert_eq!(encoded.as_str().len(), HASH_LENGTH);
            assert_eq!(encoded.as_str().chars().count(), HASH_LENGTH);
            assert!(encoded.as_bytes().iter().all(|c| ALPHABET.contains(c)));
        }
    }

    #[test]
    fn test_output_uses_only_alphabet() {
        let digest: Digest = core::array::from_fn(|i| (i as u8).wrapping_mul(37).wrapping_add(11));
        let encoded = encode_digest(&digest);
        assert!(encoded.as_bytes().iter().all(|c| ALPHABET.contains(c)));
    }
}
