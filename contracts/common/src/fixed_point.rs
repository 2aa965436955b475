//! WAD fixed-point helpers.
//!
//! Every rate and index in the vault is expressed as a fraction of
//! [`WAD`] (`1.0 == 10^18`). All helpers floor and return `None` on
//! overflow or division by zero so callers can map the failure onto their
//! own error type.

/// Fixed-point unit: `1.0`.
pub const WAD: i128 = 1_000_000_000_000_000_000;

/// Seconds in a 365-day year, the period annualised rates refer to.
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// `floor(a × b / denominator)` with checked intermediate arithmetic.
///
/// Only non-negative operands are meaningful for ledger quantities; a
/// negative input yields `None` rather than a rounded-toward-zero result.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(denominator)
}

/// Like [`mul_div_floor`] but also returns the remainder of the division.
pub fn mul_div_rem(a: i128, b: i128, denominator: i128) -> Option<(i128, i128)> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    let product = a.checked_mul(b)?;
    Some((product / denominator, product % denominator))
}

/// `floor(value × ratio / WAD)`: apply a WAD-scaled ratio to an amount.
pub fn wad_mul(value: i128, ratio: i128) -> Option<i128> {
    mul_div_floor(value, ratio, WAD)
}

/// Linear growth of a WAD index over `elapsed` seconds at an annual `rate`.
pub fn annual_growth(rate: i128, elapsed: u64) -> Option<i128> {
    mul_div_floor(rate, i128::from(elapsed), i128::from(SECONDS_PER_YEAR))
}
