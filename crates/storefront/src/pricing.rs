//! Cart pricing rules: tax, delivery, coupons, and the order total.
//!
//! All arithmetic is exact decimal. The figures are business constants
//! shared with the backend; they must not drift.

use rust_decimal::Decimal;

use meridian_core::round_to_unit;

/// Tax rate applied to the subtotal, currently 5%.
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Orders below this subtotal pay for delivery.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Flat delivery charge below the free-delivery threshold.
pub const DELIVERY_CHARGE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Recognized coupon codes as (code, minimum subtotal, discount).
const COUPONS: [(&str, Decimal, Decimal); 2] = [
    (
        "ABOVE400",
        Decimal::from_parts(400, 0, 0, false, 0),
        Decimal::from_parts(40, 0, 0, false, 0),
    ),
    (
        "ABOVE1000",
        Decimal::from_parts(1000, 0, 0, false, 0),
        Decimal::from_parts(100, 0, 0, false, 0),
    ),
];

/// Tax on a subtotal: 5%, rounded to the nearest whole unit with halves
/// away from zero.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    round_to_unit(subtotal * TAX_RATE)
}

/// Delivery charge for a subtotal: 30 below 200, free at or above.
#[must_use]
pub fn delivery_charge(subtotal: Decimal) -> Decimal {
    if subtotal < FREE_DELIVERY_THRESHOLD {
        DELIVERY_CHARGE
    } else {
        Decimal::ZERO
    }
}

/// Grand total: subtotal plus delivery plus tax minus discount.
#[must_use]
pub fn order_total(subtotal: Decimal, discount: Decimal) -> Decimal {
    subtotal + delivery_charge(subtotal) + tax(subtotal) - discount
}

/// Result of attempting to apply a coupon code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponOutcome {
    pub success: bool,
    pub discount: Decimal,
    pub message: String,
}

/// Validate a coupon code against a subtotal.
///
/// Codes are matched case-sensitively after trimming. A recognized code
/// below its minimum reports the minimum; an unknown code is invalid.
#[must_use]
pub fn apply_coupon(code: &str, subtotal: Decimal) -> CouponOutcome {
    let code = code.trim();
    for (known, minimum, discount) in COUPONS {
        if code == known {
            if subtotal >= minimum {
                return CouponOutcome {
                    success: true,
                    discount,
                    message: format!("Coupon applied! Rs {discount} discount"),
                };
            }
            return CouponOutcome {
                success: false,
                discount: Decimal::ZERO,
                message: format!("Minimum order of Rs {minimum} required for this coupon"),
            };
        }
    }
    CouponOutcome {
        success: false,
        discount: Decimal::ZERO,
        message: "Invalid coupon code".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tax_is_five_percent_rounded_to_unit() {
        assert_eq!(tax(dec!(100)), dec!(5));
        // 5% of 350 is 17.5; halves round away from zero.
        assert_eq!(tax(dec!(350)), dec!(18));
        assert_eq!(tax(dec!(349)), dec!(17));
        assert_eq!(tax(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn delivery_is_free_from_200() {
        assert_eq!(delivery_charge(dec!(199.99)), dec!(30));
        assert_eq!(delivery_charge(dec!(200)), Decimal::ZERO);
        assert_eq!(delivery_charge(dec!(500)), Decimal::ZERO);
    }

    #[test]
    fn total_combines_all_components() {
        // 450 + 0 delivery + 23 tax (22.5 rounded up) - 40 coupon.
        let outcome = apply_coupon("ABOVE400", dec!(450));
        assert!(outcome.success);
        assert_eq!(order_total(dec!(450), outcome.discount), dec!(433));

        // 150 + 30 delivery + 8 tax (7.5 rounded up), no discount.
        assert_eq!(order_total(dec!(150), Decimal::ZERO), dec!(188));
    }

    #[test]
    fn coupon_above400_requires_minimum() {
        let ok = apply_coupon("ABOVE400", dec!(400));
        assert!(ok.success);
        assert_eq!(ok.discount, dec!(40));
        assert_eq!(ok.message, "Coupon applied! Rs 40 discount");

        let below = apply_coupon("ABOVE400", dec!(399.99));
        assert!(!below.success);
        assert_eq!(below.discount, Decimal::ZERO);
        assert_eq!(
            below.message,
            "Minimum order of Rs 400 required for this coupon"
        );
    }

    #[test]
    fn coupon_above1000_requires_minimum() {
        let ok = apply_coupon("ABOVE1000", dec!(1200));
        assert!(ok.success);
        assert_eq!(ok.discount, dec!(100));
        assert_eq!(ok.message, "Coupon applied! Rs 100 discount");

        let below = apply_coupon("ABOVE1000", dec!(999));
        assert!(!below.success);
        assert_eq!(
            below.message,
            "Minimum order of Rs 1000 required for this coupon"
        );
    }

    #[test]
    fn unknown_coupon_is_invalid() {
        let outcome = apply_coupon("SAVE50", dec!(10000));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid coupon code");
    }

    #[test]
    fn coupon_codes_are_trimmed_but_case_sensitive() {
        assert!(apply_coupon("  ABOVE400  ", dec!(500)).success);
        assert!(!apply_coupon("above400", dec!(500)).success);
    }
}
