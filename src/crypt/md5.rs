//! DISCLAIMER: This is a single-block MD5 in pure Rust, written for MD5-crypt and nothing else.
//! It only accepts inputs that fit in one 64-byte block after padding (at most 55 bytes).
//! MD5 is broken. Do not use it as a general-purpose or security-relevant hash.

use super::block::{Block, BLOCK_SIZE};
use crate::error::Result;

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_OUTPUT_SIZE: usize = 16;

/// One MD5 digest.
pub type Digest = [u8; MD5_OUTPUT_SIZE];

/// Number of 32-bit words in a padded block.
const BLOCK_WORDS: usize = BLOCK_SIZE / 4;

/// Offset of the 64-bit message length at the end of a padded block.
const LENGTH_OFFSET: usize = BLOCK_SIZE - 8;

/// The initial values for (A, B, C, D) from the MD5 specification.
const INIT: State = State {
    a: 0x67452301,
    b: 0xEFCDAB89,
    c: 0x98BADCFE,
    d: 0x10325476,
};

/// The sine table constants (K) in MD5 (32 bits).
/// K[i] = floor(2^32 * abs(sin(i+1))) for i=0..63
#[rustfmt::skip]
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// The amount of left rotation performed in each MD5 step.
#[rustfmt::skip]
const S: [u32; 64] = [
    // Round 1
    7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,
    // Round 2
    5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,
    // Round 3
    4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,
    // Round 4
    6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,
];

/// The four MD5 rounds, sixteen steps each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    F,
    G,
    H,
    I,
}

impl Round {
    fn of_step(i: usize) -> Self {
        match i / 16 {
            0 => Round::F,
            1 => Round::G,
            2 => Round::H,
            _ => Round::I,
        }
    }

    /// The round's boolean mixing function.
    fn mix(self, b: u32, c: u32, d: u32) -> u32 {
        match self {
            Round::F => (b & c) | (!b & d),
            Round::G => (b & d) | (c & !d),
            Round::H => b ^ c ^ d,
            Round::I => c ^ (b | !d),
        }
    }

    /// Which message word step `i` mixes in.
    fn message_index(self, i: usize) -> usize {
        match self {
            Round::F => i,
            Round::G => (5 * i + 1) % 16,
            Round::H => (3 * i + 5) % 16,
            Round::I => (7 * i) % 16,
        }
    }
}

/// The four MD5 registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl State {
    /// Runs step `i` (0..64) and returns the rotated register set.
    fn step(self, words: &[u32; BLOCK_WORDS], i: usize) -> Self {
        let round = Round::of_step(i);
        let temp = self
            .a
            .wrapping_add(round.mix(self.b, self.c, self.d))
            .wrapping_add(words[round.message_index(i)])
            .wrapping_add(K[i])
            .rotate_left(S[i])
            .wrapping_add(self.b);

        State {
            a: self.d,
            b: temp,
            c: self.b,
            d: self.c,
        }
    }

    fn add(self, other: Self) -> Self {
        State {
            a: self.a.wrapping_add(other.a),
            b: self.b.wrapping_add(other.b),
            c: self.c.wrapping_add(other.c),
            d: self.d.wrapping_add(other.d),
        }
    }

    fn to_digest(self) -> Digest {
        let mut output = [0u8; MD5_OUTPUT_SIZE];
        output[0..4].copy_from_slice(&self.a.to_le_bytes());
        output[4..8].copy_from_slice(&self.b.to_le_bytes());
        output[8..12].copy_from_slice(&self.c.to_le_bytes());
        output[12..16].copy_from_slice(&self.d.to_le_bytes());
        output
    }
}

/// Pads `block` in place up to exactly 64 bytes: a 0x80 marker, zeros up to
/// byte 56, then the original length in bits as a little-endian u64.
///
/// Fails with a capacity violation when the block held more than 55 bytes.
fn pad(block: &mut Block) -> Result<()> {
    let length_bits = (block.len() as u64) * 8;

    block.append_byte(0x80)?;
    while block.len() < LENGTH_OFFSET {
        block.append_byte(0x00)?;
    }
    block.append_bytes(&length_bits.to_le_bytes())
}

/// Decodes a padded block into sixteen little-endian words.
fn decode_words(bytes: &[u8]) -> [u32; BLOCK_WORDS] {
    let mut words = [0u32; BLOCK_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Computes the MD5 digest of the bytes in `block`, consuming it.
///
/// The block is padded in place, so it must hold at most 55 bytes; anything
/// longer fails with [`crate::Error::CapacityViolation`] instead of spilling
/// into a second block.
pub fn md5_hash(mut block: Block) -> Result<Digest> {
    pad(&mut block)?;
    let words = decode_words(block.as_bytes());

    let state = (0..64).fold(INIT, |state, i| state.step(&words, i));
    Ok(INIT.add(state).to_digest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn digest_of(data: &[u8]) -> Digest {
        let mut block = Block::new();
        block.append_bytes(data).unwrap();
        md5_hash(block).unwrap()
    }

    // Known test vectors from RFC 1321

    #[test]
    fn test_md5_empty() {
        // MD5("") => d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(hex::encode(digest_of(b"")), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_md5_abc() {
        assert_eq!(hex::encode(digest_of(b"abc")), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_md5_message_digest() {
        assert_eq!(
            hex::encode(digest_of(b"message digest")),
            "f96b697d7cb7938d525a2f31aaf161d0"
        );
    }

    #[test]
    fn test_md5_alphabet() {
        assert_eq!(
            hex::encode(digest_of(b"abcdefghijklmnopqrstuvwxyz")),
            "c3fcd3d76192e4007dfb496cca67e13b"
        );
    }

    #[test]
    fn test_md5_largest_single_block() {
        assert_eq!(
            hex::encode(digest_of(&[b'a'; 55])),
            "ef1772b6dff9a122358552954ad0df65"
        );
    }

    #[test]
    fn test_md5_rejects_56_bytes() {
        let mut block = Block::new();
        block.append_bytes(&[0u8; 56]).unwrap();
        assert!(matches!(md5_hash(block), Err(Error::CapacityViolation { .. })));
    }

    #[test]
    fn test_padding_layout() {
        let mut block = Block::new();
        block.append_bytes(b"abc").unwrap();
        pad(&mut block).unwrap();

        let bytes = block.as_bytes();
        assert_eq!(bytes.len(), BLOCK_SIZE);
        assert_eq!(&bytes[..3], b"abc");
        assert_eq!(bytes[3], 0x80);
        assert!(bytes[4..56].iter().all(|&b| b == 0));
        assert_eq!(&bytes[56..], &24u64.to_le_bytes());
    }

    #[test]
    fn test_round_message_indices_cover_all_words() {
        for round in 0..4 {
            let mut seen = [false; 16];
            for i in round * 16..round * 16 + 16 {
                seen[Round::of_step(i).message_index(i)] = true;
            }
            assert!(seen.iter().all(|&s| s), "round {round} skips a word");
        }
    }
}
