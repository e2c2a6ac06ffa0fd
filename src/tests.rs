use crate::decimal::{to_decimal, to_decimal_exact_int, Decimal64};
use crate::intrinsics::{
    decimal_length, log10_pow2, log10_pow5, mul_shift, multiple_of_power_of_2, pow5_bits,
    pow5_factor,
};
use crate::tables::{POW5_INV_SPLIT, POW5_SPLIT};
use crate::Buffer;
use rand::Rng;
use std::string::{String, ToString};

fn print(f: f64) -> String {
    Buffer::new().format(f).to_string()
}

// Asserts the exact output bytes and that parsing them recovers the input
// bit pattern.
fn check(f: f64, expected: &str) {
    let printed = print(f);
    assert_eq!(printed, expected);
    let roundtrip = printed.parse::<f64>().unwrap();
    assert_eq!(roundtrip.to_bits(), f.to_bits());
}

fn exact_int(f: f64) -> Option<Decimal64> {
    let bits = f.to_bits();
    let mant = bits & ((1u64 << 52) - 1);
    let exp = (bits >> 52) as u32 & 0x7ff;
    to_decimal_exact_int(mant, exp)
}

#[test]
fn test_basic() {
    check(0.0, "0e+00");
    check(-0.0, "-0e+00");
    check(1.0, "1e+00");
    check(-1.0, "-1e+00");
    check(3.0, "3e+00");
    check(0.3, "3e-01");
    check(2.71828, "2.71828e+00");
    check(3.141592653589793, "3.141592653589793e+00");
}

#[test]
fn test_non_finite() {
    assert_eq!(print(f64::NAN), "NaN");
    assert_eq!(print(f64::INFINITY), "inf");
    assert_eq!(print(f64::NEG_INFINITY), "-inf");
    assert_eq!(print(f64::from_bits(0xfff8000000000000)), "NaN");
    for i in 1..100u64 {
        let f = f64::from_bits(0x7ff0000000000000 | i << 29);
        assert!(!f.is_finite());
        assert_eq!(print(f), "NaN");
    }
}

#[test]
fn test_exponent_layout() {
    // Two zero-padded digits below 100, three digits unpadded above.
    check(10000000.0, "1e+07");
    check(1.5e-5, "1.5e-05");
    check(1.1e128, "1.1e+128");
    check(1.1e-64, "1.1e-64");
    check(1e100, "1e+100");
    check(1e-100, "1e-100");
    check(123456.0, "1.23456e+05");
    check(1234000000000000.0, "1.234e+15");
    check(1.234e16, "1.234e+16");
}

#[test]
fn test_switch_to_subnormal() {
    check(2.2250738585072014e-308, "2.2250738585072014e-308");
    // Largest subnormal.
    check(f64::from_bits(0x000fffffffffffff), "2.225073858507201e-308");
}

#[test]
fn test_min_and_max() {
    assert_eq!(f64::from_bits(0x7fefffffffffffff), 1.7976931348623157e308);
    check(1.7976931348623157e308, "1.7976931348623157e+308");
    assert_eq!(f64::from_bits(1), 5e-324);
    check(5e-324, "5e-324");
}

#[test]
fn test_lots_of_trailing_zeros() {
    check(2.9802322387695312e-8, "2.9802322387695312e-08");
}

#[test]
fn test_regression() {
    check(-2.109808898695963e16, "-2.109808898695963e+16");
    check(4.940656e-318, "4.940656e-318");
    check(1.18575755e-316, "1.18575755e-316");
    check(2.989102097996e-312, "2.989102097996e-312");
    check(9.0608011534336e15, "9.0608011534336e+15");
    check(4.708356024711512e18, "4.708356024711512e+18");
    check(9.409340012568248e18, "9.409340012568248e+18");
    check(1.2345678, "1.2345678e+00");
}

#[test]
fn test_looks_like_pow5() {
    // These numbers have a mantissa that is a multiple of the largest power
    // of 5 that fits, and an exponent that causes the computation for q to
    // result in 22, which is a corner case for Ryū.
    assert_eq!(f64::from_bits(0x4830f0cf064dd592), 5.764607523034235e39);
    check(5.764607523034235e39, "5.764607523034235e+39");
    assert_eq!(f64::from_bits(0x4840f0cf064dd592), 1.152921504606847e40);
    check(1.152921504606847e40, "1.152921504606847e+40");
    assert_eq!(f64::from_bits(0x4850f0cf064dd592), 2.305843009213694e40);
    check(2.305843009213694e40, "2.305843009213694e+40");
}

#[test]
fn test_output_length() {
    check(1.2, "1.2e+00");
    check(1.23, "1.23e+00");
    check(1.234, "1.234e+00");
    check(1.2345, "1.2345e+00");
    check(1.23456, "1.23456e+00");
    check(1.234567, "1.234567e+00");
    check(1.2345678, "1.2345678e+00");
    check(1.23456789, "1.23456789e+00");
    check(1.234567895, "1.234567895e+00"); // 1.234567890 would be trimmed
    check(1.2345678901, "1.2345678901e+00");
    check(1.23456789012, "1.23456789012e+00");
    check(1.234567890123, "1.234567890123e+00");
    check(1.2345678901234, "1.2345678901234e+00");
    check(1.23456789012345, "1.23456789012345e+00");
    check(1.234567890123456, "1.234567890123456e+00");
    check(1.2345678901234567, "1.2345678901234567e+00");
}

#[test]
fn test_32bit_chunking() {
    check(4.294967294, "4.294967294e+00"); // 2^32 - 2
    check(4.294967295, "4.294967295e+00"); // 2^32 - 1
    check(4.294967296, "4.294967296e+00"); // 2^32
    check(4.294967297, "4.294967297e+00"); // 2^32 + 1
    check(4.294967298, "4.294967298e+00"); // 2^32 + 2
}

#[test]
fn test_powers_of_two() {
    // Every representable power of two must round-trip, including the
    // subnormal ones.
    for exp in 1u64..=2046 {
        let f = f64::from_bits(exp << 52);
        let printed = print(f);
        assert_eq!(printed.parse::<f64>().unwrap(), f, "2^{}", exp as i64 - 1023);
    }
    for bit in 0..52u64 {
        let f = f64::from_bits(1 << bit);
        let printed = print(f);
        assert_eq!(printed.parse::<f64>().unwrap(), f);
    }
}

#[test]
fn test_powers_of_ten() {
    // 10^22 is the largest power of ten representable exactly.
    for i in 0..=22 {
        let f = std::format!("1e{}", i).parse::<f64>().unwrap();
        assert_eq!(print(f), std::format!("1e+{:02}", i));
    }
    for i in 1..=22 {
        let f = std::format!("1e-{}", i).parse::<f64>().unwrap();
        assert_eq!(print(f), std::format!("1e-{:02}", i));
    }
}

#[test]
fn test_exact_int_fast_path() {
    assert_eq!(exact_int(1.0), Some(Decimal64 { m: 1, e: 0 }));
    assert_eq!(exact_int(3.0), Some(Decimal64 { m: 3, e: 0 }));
    assert_eq!(exact_int(100.0), Some(Decimal64 { m: 1, e: 2 }));
    assert_eq!(exact_int(1536.0), Some(Decimal64 { m: 1536, e: 0 }));
    let pow52 = 4503599627370496.0; // 2^52
    assert_eq!(
        exact_int(pow52),
        Some(Decimal64 {
            m: 4503599627370496,
            e: 0,
        })
    );
    // Fractional values and values above 2^53 fall through to the full
    // conversion.
    assert_eq!(exact_int(0.5), None);
    assert_eq!(exact_int(1.5), None);
    assert_eq!(exact_int(9007199254740992.0), None); // 2^53
    assert_eq!(exact_int(1e300), None);
    assert_eq!(exact_int(5e-324), None);
}

#[test]
fn test_to_decimal() {
    // (mantissa field, biased exponent field) -> m * 10^e
    assert_eq!(
        to_decimal(0x921fb54442d18, 1024),
        Decimal64 {
            m: 3141592653589793,
            e: -15,
        }
    );
    assert_eq!(to_decimal(1, 0), Decimal64 { m: 5, e: -324 });
    assert_eq!(
        to_decimal(0xfffffffffffff, 2046),
        Decimal64 {
            m: 17976931348623157,
            e: 292,
        }
    );
}

#[test]
fn test_random() {
    let mut buffer = Buffer::new();
    for _ in 0..100000 {
        let f: f64 = rand::random();
        let printed = buffer.format_finite(f);
        assert_eq!(printed.parse::<f64>().unwrap(), f);
    }
}

#[test]
fn test_random_bit_patterns() {
    let mut rng = rand::thread_rng();
    let mut buffer = Buffer::new();
    for _ in 0..100000 {
        let f = f64::from_bits(rng.gen::<u64>());
        if !f.is_finite() {
            continue;
        }
        let printed = buffer.format(f);
        assert_eq!(printed.parse::<f64>().unwrap().to_bits(), f.to_bits());
    }
}

#[test]
fn test_decimal_length() {
    assert_eq!(decimal_length(1), 1);
    assert_eq!(decimal_length(9), 1);
    assert_eq!(decimal_length(10), 2);
    assert_eq!(decimal_length(99), 2);
    assert_eq!(decimal_length(100), 3);
    assert_eq!(decimal_length(12345), 5);
    let mut p = 1u64;
    for digits in 1..=17 {
        assert_eq!(decimal_length(p), digits);
        assert_eq!(decimal_length(p * 10 - 1), digits);
        p *= 10;
    }
}

#[test]
fn test_pow5_factor() {
    assert_eq!(pow5_factor(1), 0);
    assert_eq!(pow5_factor(2), 0);
    assert_eq!(pow5_factor(5), 1);
    assert_eq!(pow5_factor(10), 1);
    assert_eq!(pow5_factor(25), 2);
    assert_eq!(pow5_factor(125), 3);
    assert_eq!(pow5_factor(3125), 5);
    assert_eq!(pow5_factor(5u64.pow(27)), 27);
    assert!(multiple_of_power_of_2(8, 3));
    assert!(!multiple_of_power_of_2(8, 4));
}

#[test]
fn test_log_approximations() {
    // Exact references computed in u128 over the checkable prefix of each
    // documented range.
    for e in 0..=127 {
        let digits = (1u128 << e).to_string().len() as u32;
        assert_eq!(log10_pow2(e as i32), digits - 1, "e={e}");
    }
    for e in 0..=55u32 {
        let pow5 = 5u128.pow(e);
        let digits = pow5.to_string().len() as u32;
        assert_eq!(log10_pow5(e as i32), digits - 1, "e={e}");
        let bits = 128 - pow5.leading_zeros();
        if e > 0 {
            assert_eq!(pow5_bits(e as i32), bits as i32, "e={e}");
        }
    }
    assert_eq!(pow5_bits(0), 1);
}

#[test]
fn test_mul_shift() {
    // u = 2^121 exactly: floor(m * 2^121 / 2^121) = m.
    assert_eq!(mul_shift(123456, (0, 1 << 57), 121), 123456);
    // u = 2^126 + 1: the low word contributes nothing after the shift.
    assert_eq!(mul_shift(1, (1, 1 << 62), 126), 1);
    assert_eq!(mul_shift(3, (1, 1 << 62), 126), 3);
}

#[test]
fn test_tables() {
    assert_eq!(POW5_SPLIT.len(), 326);
    assert_eq!(POW5_INV_SPLIT.len(), 292);
    assert_eq!(POW5_SPLIT[0], (0, 1 << 56));
    assert_eq!(POW5_INV_SPLIT[0], (1, 1 << 58));

    // Entries whose exact value fits in 128 bits can be checked directly
    // against the defining shift of 5^i to 121 leading bits.
    for i in 0..=55u32 {
        let pow5 = 5u128.pow(i);
        let bits = (128 - pow5.leading_zeros()) as i32;
        let expected = if bits <= 121 {
            pow5 << (121 - bits)
        } else {
            pow5 >> (bits - 121)
        };
        let (lo, hi) = POW5_SPLIT[i as usize];
        assert_eq!((hi as u128) << 64 | lo as u128, expected, "i={i}");
    }
    for q in 0..=2u32 {
        let pow5 = 5u128.pow(q);
        let bits = 128 - pow5.leading_zeros();
        let expected = (1u128 << (bits - 1 + 122)) / pow5 + 1;
        let (lo, hi) = POW5_INV_SPLIT[q as usize];
        assert_eq!((hi as u128) << 64 | lo as u128, expected, "q={q}");
    }
}
