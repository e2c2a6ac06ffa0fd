//! Shortest-decimal conversion for binary64.
//!
//! The algorithm computes the interval of decimal values that round back to
//! the input under round-to-nearest-even, scales it into a decimal power
//! base with one 128-bit table multiplication per boundary, and then removes
//! digits until one more removal would leave the interval.

use crate::intrinsics::{
    log10_pow2, log10_pow5, mul_shift, multiple_of_power_of_2, multiple_of_power_of_5, pow5_bits,
};
use crate::tables::{POW5_BITS, POW5_INV_BITS, POW5_INV_SPLIT, POW5_SPLIT};

pub(crate) const MANTISSA_BITS: u32 = 52;
pub(crate) const EXPONENT_BITS: u32 = 11;
const BIAS: i32 = 1023;

/// A decimal floating point number m * 10^e.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct Decimal64 {
    pub m: u64,
    pub e: i32,
}

/// Fast path for values that are exact integers within the 53 significant
/// bits. Returns None when low bits would be discarded by the shift; the
/// caller then runs the full conversion.
pub(crate) fn to_decimal_exact_int(mant: u64, exp: u32) -> Option<Decimal64> {
    let e = exp as i32 - BIAS;
    if !(0..=MANTISSA_BITS as i32).contains(&e) {
        return None;
    }
    let shift = MANTISSA_BITS as i32 - e;
    let full = 1 << MANTISSA_BITS | mant;
    let mut m = full >> shift;
    if m << shift != full {
        return None;
    }

    let mut e10 = 0;
    while m % 10 == 0 {
        m /= 10;
        e10 += 1;
    }
    Some(Decimal64 { m, e: e10 })
}

/// Converts the raw mantissa and biased exponent fields of a finite,
/// non-zero double to its shortest round-trip decimal representation.
pub(crate) fn to_decimal(mant: u64, exp: u32) -> Decimal64 {
    // Step 1: unify the normal and subnormal cases. Subtracting 2 more from
    // the exponent gives the bounds computation two extra low bits, so the
    // halfway points to the neighboring doubles are integers.
    let (m2, e2) = if exp == 0 {
        (mant, 1 - BIAS - MANTISSA_BITS as i32 - 2)
    } else {
        (
            1 << MANTISSA_BITS | mant,
            exp as i32 - BIAS - MANTISSA_BITS as i32 - 2,
        )
    };
    let even = m2 & 1 == 0;
    let accept_bounds = even;

    // Step 2: determine the interval of valid decimal representations.
    // mp = mv + 2 and mm = mv - 1 - mm_shift are never materialized; the
    // shift accounts for the predecessor having a smaller exponent when the
    // mantissa field is zero.
    let mv = 4 * m2;
    let mm_shift = u64::from(mant != 0 || exp <= 1);

    // Step 3: convert to a decimal power base using 128-bit arithmetic.
    let mut vr: u64;
    let mut vp: u64;
    let mut vm: u64;
    let e10: i32;
    let mut vm_is_trailing_zeros = false;
    let mut vr_is_trailing_zeros = false;
    if e2 >= 0 {
        // This expression is slightly faster than max(0, log10_pow2(e2) - 1).
        let q = log10_pow2(e2) - u32::from(e2 > 3);
        e10 = q as i32;
        let k = POW5_INV_BITS + pow5_bits(q as i32) - 1;
        let i = -e2 + q as i32 + k;
        let mul = unsafe {
            debug_assert!((q as usize) < POW5_INV_SPLIT.len());
            *POW5_INV_SPLIT.get_unchecked(q as usize)
        };
        vr = mul_shift(4 * m2, mul, i);
        vp = mul_shift(4 * m2 + 2, mul, i);
        vm = mul_shift(4 * m2 - 1 - mm_shift, mul, i);
        if q <= 21 {
            // This should use q <= 22, but 21 is also known to be safe.
            // Only one of mp, mv and mm can be a multiple of 5, if any.
            if mv % 5 == 0 {
                vr_is_trailing_zeros = multiple_of_power_of_5(mv, q);
            } else if accept_bounds {
                // Same as min(e2 + (!mm & 1), pow5_factor(mm)) >= q, which
                // reduces to the 5-divisibility test since e2 >= q.
                vm_is_trailing_zeros = multiple_of_power_of_5(mv - 1 - mm_shift, q);
            } else if multiple_of_power_of_5(mv + 2, q) {
                // Same as min(e2 + 1, pow5_factor(mp)) >= q.
                vp -= 1;
            }
        }
    } else {
        // This expression is slightly faster than max(0, log10_pow5(-e2) - 1).
        let q = log10_pow5(-e2) - u32::from(-e2 > 1);
        e10 = q as i32 + e2;
        let i = -e2 - q as i32;
        let k = pow5_bits(i) - POW5_BITS;
        let j = q as i32 - k;
        let mul = unsafe {
            debug_assert!((i as usize) < POW5_SPLIT.len());
            *POW5_SPLIT.get_unchecked(i as usize)
        };
        vr = mul_shift(4 * m2, mul, j);
        vp = mul_shift(4 * m2 + 2, mul, j);
        vm = mul_shift(4 * m2 - 1 - mm_shift, mul, j);
        if q <= 1 {
            // {vr,vp,vm} has trailing zeros if {mv,mp,mm} has at least q
            // trailing zero bits. mv = 4 * m2 always has at least two.
            vr_is_trailing_zeros = true;
            if accept_bounds {
                // mm = mv - 1 - mm_shift has one trailing zero bit iff
                // mm_shift == 1.
                vm_is_trailing_zeros = mm_shift == 1;
            } else {
                // mp = mv + 2 always has at least one trailing zero bit.
                vp -= 1;
            }
        } else if q < 63 {
            // vr has q - 1 trailing zeros if ntz(mv) >= q - 1; the power-of-5
            // factor never limits this because -e2 >= q.
            vr_is_trailing_zeros = multiple_of_power_of_2(mv, q - 1);
        }
    }

    // Step 4: find the shortest decimal representation in the interval.
    // On average ~2 digits are removed.
    let mut removed = 0;
    let mut last_removed_digit = 0u8;
    let out = if vm_is_trailing_zeros || vr_is_trailing_zeros {
        // General case, which happens rarely (~0.7%).
        while vp / 10 > vm / 10 {
            vm_is_trailing_zeros &= vm % 10 == 0;
            vr_is_trailing_zeros &= last_removed_digit == 0;
            last_removed_digit = (vr % 10) as u8;
            vr /= 10;
            vp /= 10;
            vm /= 10;
            removed += 1;
        }
        if vm_is_trailing_zeros {
            while vm % 10 == 0 {
                vr_is_trailing_zeros &= last_removed_digit == 0;
                last_removed_digit = (vr % 10) as u8;
                vr /= 10;
                vp /= 10;
                vm /= 10;
                removed += 1;
            }
        }
        if vr_is_trailing_zeros && last_removed_digit == 5 && vr % 2 == 0 {
            // Round even if the exact value ends in .....50..0.
            last_removed_digit = 4;
        }
        // Take vr + 1 if vr is outside bounds or we need to round up.
        vr + u64::from(
            (vr == vm && (!accept_bounds || !vm_is_trailing_zeros)) || last_removed_digit >= 5,
        )
    } else {
        // Specialized for the common case (~99.3%). Percentages below are
        // relative to this.
        let mut round_up = false;
        if vp / 100 > vm / 100 {
            // Optimization: remove two digits at a time (~86.2%).
            round_up = vr % 100 >= 50;
            vr /= 100;
            vp /= 100;
            vm /= 100;
            removed += 2;
        }
        // Loop iterations below (approximately), with the optimization
        // above: 0: 70.6%, 1: 27.8%, 2: 1.40%, 3: 0.14%, 4+: 0.02%
        while vp / 10 > vm / 10 {
            round_up = vr % 10 >= 5;
            vr /= 10;
            vp /= 10;
            vm /= 10;
            removed += 1;
        }
        // Take vr + 1 if vr is outside bounds or we need to round up.
        vr + u64::from(vr == vm || round_up)
    };

    Decimal64 {
        m: out,
        e: e10 + removed,
    }
}
