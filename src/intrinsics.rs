// Fixed-width arithmetic helpers for the conversion core. Everything here
// operates on plain unsigned integers; the only wide arithmetic is the
// 64x128-bit multiply in mul_shift.

/// Computes floor((m * (hi * 2^64 + lo)) / 2^shift) for shifts in [64, 128).
///
/// The low 64 bits of m * lo never reach the result because the shift is at
/// least 64, so only the high halves of the two partial products are summed.
#[inline]
pub(crate) fn mul_shift(m: u64, mul: (u64, u64), shift: i32) -> u64 {
    debug_assert!((64..128).contains(&shift));
    let lo = m as u128 * mul.0 as u128;
    let hi = m as u128 * mul.1 as u128;
    (((lo >> 64) + hi) >> (shift - 64)) as u64
}

/// Returns the largest n such that 5^n divides v. Requires v != 0.
pub(crate) fn pow5_factor(mut v: u64) -> u32 {
    let mut count = 0;
    loop {
        debug_assert!(v != 0);
        let q = v / 5;
        let r = v % 5;
        if r != 0 {
            return count;
        }
        v = q;
        count += 1;
    }
}

/// Returns true if v is divisible by 5^p.
#[inline]
pub(crate) fn multiple_of_power_of_5(v: u64, p: u32) -> bool {
    pow5_factor(v) >= p
}

/// Returns true if v is divisible by 2^p.
#[inline]
pub(crate) fn multiple_of_power_of_2(v: u64, p: u32) -> bool {
    v.trailing_zeros() >= p
}

/// Returns ceil(log2(5^e)) for e in [0, 3528], which is also the bit length
/// of 5^e for e >= 1.
#[inline]
pub(crate) fn pow5_bits(e: i32) -> i32 {
    debug_assert!((0..=3528).contains(&e));
    ((e as u32 * 1217359) >> 19) as i32 + 1
}

/// Returns floor(log10(2^e)) for e in [0, 1650].
#[inline]
pub(crate) fn log10_pow2(e: i32) -> u32 {
    debug_assert!((0..=1650).contains(&e));
    (e as u32 * 78913) >> 18
}

/// Returns floor(log10(5^e)) for e in [0, 2620].
#[inline]
pub(crate) fn log10_pow5(e: i32) -> u32 {
    debug_assert!((0..=2620).contains(&e));
    (e as u32 * 732923) >> 20
}

/// Returns the number of decimal digits in v, for v < 10^17. 17 digits are
/// sufficient to round-trip any double, so larger inputs cannot occur.
pub(crate) fn decimal_length(v: u64) -> u32 {
    debug_assert!(v < 100000000000000000);
    // The average mantissa is 16.38 digits long, so check high to low.
    if v >= 10000000000000000 {
        17
    } else if v >= 1000000000000000 {
        16
    } else if v >= 100000000000000 {
        15
    } else if v >= 10000000000000 {
        14
    } else if v >= 1000000000000 {
        13
    } else if v >= 100000000000 {
        12
    } else if v >= 10000000000 {
        11
    } else if v >= 1000000000 {
        10
    } else if v >= 100000000 {
        9
    } else if v >= 10000000 {
        8
    } else if v >= 1000000 {
        7
    } else if v >= 100000 {
        6
    } else if v >= 10000 {
        5
    } else if v >= 1000 {
        4
    } else if v >= 100 {
        3
    } else if v >= 10 {
        2
    } else {
        1
    }
}
