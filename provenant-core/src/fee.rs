//! Registration fee estimation.

/// Flat fee charged for every registration, in ledger credits.
pub const BASE_FEE: f64 = 0.002;

/// Additional fee per MiB of content.
pub const SIZE_FEE_PER_MIB: f64 = 0.0001;

/// Derivatives carry an audit trail and cost more to process.
pub const DERIVATIVE_MULTIPLIER: f64 = 1.2;

/// Estimate the registration fee for a byte source.
///
/// Pure function of the content size and the derivative flag; verification
/// never consults it.
pub fn estimate_fee(size_bytes: u64, derivative: bool) -> f64 {
    let size_fee = size_bytes as f64 / (1024.0 * 1024.0) * SIZE_FEE_PER_MIB;
    let multiplier = if derivative { DERIVATIVE_MULTIPLIER } else { 1.0 };
    round_to_credits((BASE_FEE + size_fee) * multiplier)
}

/// Fees are quoted to five decimal places.
fn round_to_credits(fee: f64) -> f64 {
    (fee * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_pays_base_fee() {
        assert_eq!(estimate_fee(0, false), BASE_FEE);
    }

    #[test]
    fn test_size_fee_scales_per_mib() {
        assert_eq!(estimate_fee(1024 * 1024, false), 0.0021);
        assert_eq!(estimate_fee(10 * 1024 * 1024, false), 0.003);
    }

    #[test]
    fn test_derivative_multiplier() {
        assert_eq!(estimate_fee(1024 * 1024, true), 0.00252);
    }

    #[test]
    fn test_fee_is_rounded_to_five_places() {
        // 1.5 KiB: size fee alone is below the quoting precision.
        let fee = estimate_fee(1536, false);
        assert_eq!(fee, 0.002);
    }

    #[test]
    fn test_fee_is_deterministic() {
        assert_eq!(estimate_fee(123_456, true), estimate_fee(123_456, true));
    }
}
