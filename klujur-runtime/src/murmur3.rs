// klujur-runtime - Murmur3 hash mixing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Murmur3 (x86, 32-bit) mixing steps used by value hashes.
//!
//! Bit-exact with the reference runtime for integers and strings, so those
//! hashes agree across implementations. Collection hashes fold elements with
//! `hash_combine` and only use [`mix_coll_hash`] as the final step. All
//! arithmetic wraps.

const SEED: i32 = 0;
const C1: i32 = 0xcc9e2d51_u32 as i32;
const C2: i32 = 0x1b873593;

/// Hash a 32-bit integer. `hash_int(0) == 0`.
pub fn hash_int(input: i32) -> i32 {
    if input == 0 {
        return 0;
    }
    let k1 = mix_k1(input);
    let h1 = mix_h1(SEED, k1);
    fmix(h1, 4)
}

/// Hash a 64-bit integer. `hash_long(0) == 0`.
pub fn hash_long(input: i64) -> i32 {
    if input == 0 {
        return 0;
    }
    let low = input as i32;
    let high = ((input as u64) >> 32) as i32;

    let k1 = mix_k1(low);
    let mut h1 = mix_h1(SEED, k1);

    let k1 = mix_k1(high);
    h1 = mix_h1(h1, k1);

    fmix(h1, 8)
}

/// Hash a string by its UTF-16 code units.
pub fn hash_unencoded_chars(s: &str) -> i32 {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut h1 = SEED;

    // step through the input 2 code units at a time
    for pair in units.chunks_exact(2) {
        let k1 = (pair[0] as i32) | ((pair[1] as i32) << 16);
        let k1 = mix_k1(k1);
        h1 = mix_h1(h1, k1);
    }

    // deal with any remaining code unit
    if units.len() % 2 == 1 {
        let k1 = units[units.len() - 1] as i32;
        let k1 = mix_k1(k1);
        h1 ^= k1;
    }

    fmix(h1, (2 * units.len()) as i32)
}

/// Finalise an accumulated collection hash with its element count.
pub fn mix_coll_hash(hash: i32, count: usize) -> i32 {
    let k1 = mix_k1(hash);
    let h1 = mix_h1(SEED, k1);
    fmix(h1, count as i32)
}

fn mix_k1(k1: i32) -> i32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn mix_h1(h1: i32, k1: i32) -> i32 {
    (h1 ^ k1)
        .rotate_left(13)
        .wrapping_mul(5)
        .wrapping_add(0xe6546b64_u32 as i32)
}

// Force all bits of a hash block to avalanche
fn fmix(h1: i32, length: i32) -> i32 {
    let mut h = (h1 ^ length) as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h as i32
}
