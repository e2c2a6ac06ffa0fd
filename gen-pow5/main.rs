// Power of 5 table generator for the Ryū shortest-decimal algorithm:
// https://dl.acm.org/doi/10.1145/3192366.3192369
//
// Prints the contents of src/tables.rs to stdout. POW5_SPLIT holds the 121
// leading bits of 5^i, truncated; POW5_INV_SPLIT holds ceiling divisions
// 2^(floor(log2(5^q)) + 122) / 5^q, so that mul_shift sees an overestimate
// of the inverse power.

use num_bigint::BigUint as Uint;
use num_integer::Integer as _;

const POW5_TABLE_SIZE: u32 = 326;
const POW5_INV_TABLE_SIZE: u32 = 292;
const POW5_BITS: u64 = 121; // max 127
const POW5_INV_BITS: u64 = 122; // max 127

fn main() {
    println!("// Code generated by gen-pow5. DO NOT EDIT.");
    println!();
    println!("// 128-bit truncated significands of 5^i, and rounded-up significands of");
    println!("// 2^k / 5^q, stored as (lo, hi) pairs. See gen-pow5/main.rs for the exact");
    println!("// construction.");
    println!();
    println!("pub(crate) const POW5_BITS: i32 = {POW5_BITS};");
    println!("pub(crate) const POW5_INV_BITS: i32 = {POW5_INV_BITS};");
    println!();

    println!("pub(crate) static POW5_SPLIT: [(u64, u64); {POW5_TABLE_SIZE}] = [");
    for i in 0..POW5_TABLE_SIZE {
        let pow5 = Uint::from(5_u8).pow(i);
        let shift = pow5.bits() as i64 - POW5_BITS as i64;
        print_entry(&shr(&pow5, shift));
    }
    println!("];");
    println!();

    println!("pub(crate) static POW5_INV_SPLIT: [(u64, u64); {POW5_INV_TABLE_SIZE}] = [");
    for q in 0..POW5_INV_TABLE_SIZE {
        let pow5 = Uint::from(5_u8).pow(q);
        // floor(log2(5^q)) is bits() - 1; round the quotient up.
        let shift = pow5.bits() - 1 + POW5_INV_BITS;
        let mut inv = (Uint::from(1_u8) << shift) / pow5;
        inv.inc();
        print_entry(&inv);
    }
    println!("];");
}

fn shr(x: &Uint, n: i64) -> Uint {
    if n < 0 {
        x << -n as u64
    } else {
        x >> n as u64
    }
}

fn print_entry(v: &Uint) {
    let mask = (Uint::from(1_u8) << 64_u32) - Uint::from(1_u8);
    let lo = v & &mask;
    let hi = v >> 64_u32;
    println!("    (0x{lo:016x}, 0x{hi:016x}),");
}
