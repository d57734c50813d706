use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept on currency amounts.
pub const MONEY_PLACES: u32 = 2;

/// Fractional digits kept on a unit price converted to local currency.
pub const UNIT_PRICE_PLACES: u32 = 4;

/// Round half to even and fix the scale at exactly `places` digits, so
/// `49.7` quantized to four places reads `49.7000`.
pub fn quantize(value: Decimal, places: u32) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(places);
    rounded
}
