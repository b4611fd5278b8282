//! cyrb53 fingerprint for cache partitioning.
//!
//! Not a cryptographic hash. Keys bucket cached renders by preference
//! combination and must never be used to authenticate a payload.

const SEED_A: u32 = 0xdead_beef;
const SEED_B: u32 = 0x41c6_ce57;
const MUL_A: u32 = 2_654_435_761;
const MUL_B: u32 = 1_597_334_677;
const MIX_A: u32 = 2_246_822_507;
const MIX_B: u32 = 3_266_489_909;

/// 53-bit cyrb53 hash of `text`, seeded with its length.
///
/// Folds UTF-16 code units so results agree with JavaScript implementations.
pub fn cyrb53(text: &str) -> u64 {
    let seed = text.encode_utf16().count() as u32;
    let mut h1 = SEED_A ^ seed;
    let mut h2 = SEED_B ^ seed;

    for unit in text.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(MUL_A);
        h2 = (h2 ^ ch).wrapping_mul(MUL_B);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(MIX_A);
    h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(MIX_B);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(MIX_A);
    h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(MIX_B);

    (u64::from(h2 & 0x1f_ffff) << 32) | u64::from(h1)
}

/// Cache-partition key for canonical text: [`cyrb53`] in lowercase base 36.
pub fn cache_key(text: &str) -> String {
    to_base36(cyrb53(text))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(11);
    while n > 0 {
        digits.push(char::from(DIGITS[(n % 36) as usize]));
        n /= 36;
    }
    digits.into_iter().rev().collect()
}
