//! Royalty pricing.
//!
//! Synthesis is billed per started block of 100 text units at 0.2 tokens
//! per block, with a one-block minimum. Text units are UTF-16 code units,
//! as counted by [`SynthesisRequest::text_length`](crate::SynthesisRequest::text_length). The voice owner's royalty is the
//! `royalty_bps` share of that price, rounded to four decimal places.
//! All arithmetic is done in 1/10000-token units, so the result is exact.

use vn_types::TokenAmount;

/// Text units per billable block.
pub const CHARS_PER_UNIT: u64 = 100;

/// Price of one billable block (0.2 tokens).
pub const UNIT_PRICE: TokenAmount = TokenAmount::from_units(2_000);

/// Upper bound for `royalty_bps` (100%).
pub const MAX_ROYALTY_BPS: u16 = 10_000;

/// Number of billable blocks for a text of `text_len` characters.
pub fn billable_units(text_len: u64) -> u64 {
    text_len.div_ceil(CHARS_PER_UNIT).max(1)
}

/// Gross price of synthesizing `text_len` characters.
pub fn base_price(text_len: u64) -> TokenAmount {
    TokenAmount::from_units(billable_units(text_len).saturating_mul(UNIT_PRICE.units()))
}

/// Royalty accrued to the owner for synthesizing `text_len` characters.
///
/// `round(base * bps / 10000)` to four places, computed in token units.
pub fn compute_royalty(text_len: u64, royalty_bps: u16) -> TokenAmount {
    let base = u128::from(base_price(text_len).units());
    let bps = u128::from(royalty_bps);
    let denom = u128::from(MAX_ROYALTY_BPS);
    let share = (base * bps + denom / 2) / denom;
    TokenAmount::from_units(u64::try_from(share).unwrap_or(u64::MAX))
}
