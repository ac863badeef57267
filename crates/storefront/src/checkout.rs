//! Checkout flow: address and payment validation, shipping methods,
//! and order submission.
//!
//! The flow is a linear state machine: address, shipping method,
//! payment. Each step keeps its input until validation passes;
//! submission posts the order from the server-side cart and empties the
//! cart on success. A failed submission stays on the payment step with
//! the service's message.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

use meridian_core::{Order, ShippingAddress, UserId};

use crate::api::{CreateOrderRequest, OrderApi};
use crate::session::AuthState;
use crate::stores::CartStore;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\d\s\-\(\)]{10,}$").unwrap_or_else(|e| unreachable!("phone regex: {e}"))
});
static CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4} \d{4} \d{4} \d{4}$").unwrap_or_else(|e| unreachable!("card regex: {e}"))
});
static CVC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{3,4}$").unwrap_or_else(|e| unreachable!("cvc regex: {e}"))
});
static UPI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+$").unwrap_or_else(|e| unreachable!("upi regex: {e}"))
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| unreachable!("email regex: {e}"))
});
static ZIP_US_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}(-\d{4})?$").unwrap_or_else(|e| unreachable!("us zip regex: {e}"))
});
static ZIP_CA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$")
        .unwrap_or_else(|e| unreachable!("ca zip regex: {e}"))
});
static ZIP_UK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{5,8}$").unwrap_or_else(|e| unreachable!("uk zip regex: {e}"))
});
static ZIP_AU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}$").unwrap_or_else(|e| unreachable!("au zip regex: {e}"))
});
static ZIP_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{6}$").unwrap_or_else(|e| unreachable!("in zip regex: {e}"))
});

/// Orders at or above this subtotal ship free on the standard method.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Validate a postal code for the given country. Countries without a
/// known format only require three characters.
#[must_use]
pub fn is_valid_postal_code(country: &str, zipcode: &str) -> bool {
    let zipcode = zipcode.trim();
    match country.trim() {
        "United States" | "USA" | "US" => ZIP_US_RE.is_match(zipcode),
        "Canada" | "CA" => ZIP_CA_RE.is_match(zipcode),
        "United Kingdom" | "UK" | "GB" => {
            ZIP_UK_RE.is_match(&zipcode.replace(' ', ""))
        }
        "Australia" | "AU" => ZIP_AU_RE.is_match(zipcode),
        "India" | "IN" => ZIP_IN_RE.is_match(zipcode),
        _ => zipcode.len() >= 3,
    }
}

/// Validate a phone number: at least ten digits, spaces, dashes, or
/// parentheses, optionally prefixed with `+`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

/// A validation failure tied to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Shipping options and their flat rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    /// Shipping cost for a given cart subtotal. Standard is free; see
    /// [`FREE_SHIPPING_THRESHOLD`] for the promotional cutoff shown to
    /// customers.
    #[must_use]
    pub fn rate(self, _subtotal: Decimal) -> Decimal {
        match self {
            Self::Standard => Decimal::ZERO,
            Self::Express => Decimal::from_parts(1599, 0, 0, false, 2),
            Self::Overnight => Decimal::from_parts(2999, 0, 0, false, 2),
        }
    }

    /// Wire descriptor for the order payload.
    #[must_use]
    pub const fn descriptor(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }
}

/// Payment details entered during checkout. Only the descriptor and the
/// validation verdict ever leave the client; raw details are not sent
/// to the order service.
#[derive(Debug, Clone)]
pub enum PaymentDetails {
    Card {
        /// Formatted as four groups of four digits.
        number: String,
        holder: String,
        expiry: String,
        cvc: String,
    },
    Upi {
        vpa: String,
    },
    Paypal {
        email: String,
    },
    CashOnDelivery,
}

impl PaymentDetails {
    /// Wire descriptor for the order payload.
    #[must_use]
    pub const fn descriptor(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::Upi { .. } => "upi",
            Self::Paypal { .. } => "paypal",
            Self::CashOnDelivery => "cod",
        }
    }

    /// Validate the entered details.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self {
            Self::Card {
                number,
                holder,
                expiry,
                cvc,
            } => {
                if !CARD_RE.is_match(number) {
                    errors.push(FieldError::new(
                        "cardNumber",
                        "Card number must be 16 digits in groups of 4",
                    ));
                }
                if holder.trim().is_empty() {
                    errors.push(FieldError::new("cardHolder", "Card holder name is required"));
                }
                if !is_valid_expiry(expiry) {
                    errors.push(FieldError::new("expiry", "Expiry must be MM/YY"));
                }
                if !CVC_RE.is_match(cvc) {
                    errors.push(FieldError::new("cvc", "CVC must be 3 or 4 digits"));
                }
            }
            Self::Upi { vpa } => {
                if !UPI_RE.is_match(vpa.trim()) {
                    errors.push(FieldError::new("vpa", "Enter a valid UPI ID"));
                }
            }
            Self::Paypal { email } => {
                if !EMAIL_RE.is_match(email.trim()) {
                    errors.push(FieldError::new("email", "Enter a valid PayPal email"));
                }
            }
            Self::CashOnDelivery => {}
        }
        errors
    }
}

fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    let month_ok = month.len() == 2 && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m));
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}

/// Validate a shipping address.
#[must_use]
pub fn validate_address(address: &ShippingAddress) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if address.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "First name is required"));
    }
    if address.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }
    if address.street.trim().is_empty() {
        errors.push(FieldError::new("street", "Street address is required"));
    }
    if address.city.trim().is_empty() {
        errors.push(FieldError::new("city", "City is required"));
    }
    if address.country.trim().is_empty() {
        errors.push(FieldError::new("country", "Country is required"));
    }
    if !is_valid_postal_code(&address.country, &address.zipcode) {
        errors.push(FieldError::new("zipcode", "Enter a valid postal code"));
    }
    if let Some(phone) = &address.phone
        && !phone.trim().is_empty()
        && !is_valid_phone(phone)
    {
        errors.push(FieldError::new("phone", "Enter a valid phone number"));
    }
    errors
}

/// Steps of the checkout flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Address,
    Shipping,
    Payment,
    /// Terminal; reached only through a successful submission.
    Complete,
}

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("validation failed")]
    Invalid(Vec<FieldError>),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("operation not valid at this checkout step")]
    WrongStep,

    #[error("{0}")]
    Rejected(String),
}

/// A single checkout in progress.
///
/// Owned by one caller; not shared. The cart store supplies the pricing
/// figures and is emptied after a successful submission.
pub struct CheckoutFlow {
    cart: CartStore,
    orders: OrderApi,
    auth: watch::Receiver<AuthState>,
    step: CheckoutStep,
    address: Option<ShippingAddress>,
    shipping_method: ShippingMethod,
    payment: Option<PaymentDetails>,
    notes: Option<String>,
    placed: Option<Order>,
}

impl CheckoutFlow {
    /// Start a checkout at the address step.
    #[must_use]
    pub fn new(cart: CartStore, orders: OrderApi, auth: watch::Receiver<AuthState>) -> Self {
        Self {
            cart,
            orders,
            auth,
            step: CheckoutStep::Address,
            address: None,
            shipping_method: ShippingMethod::default(),
            payment: None,
            notes: None,
            placed: None,
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The order placed by a successful submission.
    #[must_use]
    pub const fn placed_order(&self) -> Option<&Order> {
        self.placed.as_ref()
    }

    /// Store the shipping address; validated on [`Self::next`].
    pub fn set_address(&mut self, address: ShippingAddress) {
        self.address = Some(address);
    }

    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        self.shipping_method = method;
    }

    /// Store the payment details; validated on [`Self::submit`].
    pub fn set_payment(&mut self, payment: PaymentDetails) {
        self.payment = Some(payment);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }

    /// Advance to the next step. The address step is gated by address
    /// validation; the shipping step always has a valid default method.
    ///
    /// # Errors
    ///
    /// Returns the field errors when the address is missing or invalid,
    /// or [`CheckoutError::WrongStep`] at the payment step (use
    /// [`Self::submit`]) and after completion.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        match self.step {
            CheckoutStep::Address => {
                let Some(address) = &self.address else {
                    return Err(CheckoutError::Invalid(vec![FieldError::new(
                        "address",
                        "Shipping address is required",
                    )]));
                };
                let errors = validate_address(address);
                if !errors.is_empty() {
                    return Err(CheckoutError::Invalid(errors));
                }
                self.step = CheckoutStep::Shipping;
                Ok(self.step)
            }
            CheckoutStep::Shipping => {
                self.step = CheckoutStep::Payment;
                Ok(self.step)
            }
            CheckoutStep::Payment | CheckoutStep::Complete => Err(CheckoutError::WrongStep),
        }
    }

    /// Step back towards the address step. No effect at the address
    /// step or after completion.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Shipping => CheckoutStep::Address,
            other => other,
        };
    }

    /// Validate the payment details and place the order.
    ///
    /// On success the cart is emptied and the flow completes. On
    /// rejection the flow stays at the payment step so the caller can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Invalid`] for bad payment details,
    /// [`CheckoutError::NotAuthenticated`] without a session, and
    /// [`CheckoutError::Rejected`] with the service's message otherwise.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Order, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep);
        }
        let Some(payment) = &self.payment else {
            return Err(CheckoutError::Invalid(vec![FieldError::new(
                "payment",
                "Payment details are required",
            )]));
        };
        let errors = payment.validate();
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }
        let Some((user_id, token)) = self.credentials() else {
            return Err(CheckoutError::NotAuthenticated);
        };
        let Some(address) = self.address.clone() else {
            return Err(CheckoutError::Invalid(vec![FieldError::new(
                "address",
                "Shipping address is required",
            )]));
        };

        let request = self.order_request(payment.descriptor(), address);

        match self.orders.create(user_id, &request, Some(&token)).await {
            Ok(order) => {
                self.cart.clear().await;
                self.placed = Some(order.clone());
                self.step = CheckoutStep::Complete;
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "order submission failed");
                Err(CheckoutError::Rejected(e.to_string()))
            }
        }
    }

    fn order_request(&self, payment_method: &str, address: ShippingAddress) -> CreateOrderRequest {
        let subtotal = self.cart.subtotal();
        let coupon = self.cart.applied_coupon();
        CreateOrderRequest {
            phone_number: address.phone.clone(),
            email: self.auth.borrow().user.as_ref().map(|u| u.email.to_string()),
            shipping_address: address,
            billing_address: None,
            notes: self.notes.clone(),
            payment_method: payment_method.to_string(),
            tax_amount: self.cart.tax_amount(),
            // The chosen method's rate replaces the cart-page delivery
            // charge; it is never added on top.
            shipping_amount: self.shipping_method.rate(subtotal),
            discount_amount: self.cart.discount(),
            coupon_code: coupon.map(|c| c.code),
        }
    }

    fn credentials(&self) -> Option<(UserId, String)> {
        let state = self.auth.borrow();
        match (&state.user, &state.token) {
            (Some(user), Some(token)) => Some((user.id, token.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            street: "123 Main St".into(),
            apartment: None,
            city: "New York".into(),
            country: "United States".into(),
            zipcode: "10001".into(),
            phone: Some("+1 212 555 0199".into()),
        }
    }

    #[test]
    fn postal_codes_match_country_formats() {
        assert!(is_valid_postal_code("United States", "10001"));
        assert!(is_valid_postal_code("United States", "10001-1234"));
        assert!(!is_valid_postal_code("United States", "1000"));

        assert!(is_valid_postal_code("Canada", "K1A 0B1"));
        assert!(is_valid_postal_code("Canada", "K1A-0B1"));
        assert!(is_valid_postal_code("Canada", "K1A0B1"));
        assert!(!is_valid_postal_code("Canada", "12345"));

        assert!(is_valid_postal_code("United Kingdom", "SW1A 1AA"));
        assert!(!is_valid_postal_code("United Kingdom", "SW1"));

        assert!(is_valid_postal_code("Australia", "2000"));
        assert!(!is_valid_postal_code("Australia", "20000"));

        assert!(is_valid_postal_code("India", "110001"));
        assert!(!is_valid_postal_code("India", "1100"));

        // Unknown countries only need three characters.
        assert!(is_valid_postal_code("France", "750"));
        assert!(!is_valid_postal_code("France", "75"));
    }

    #[test]
    fn phone_requires_ten_characters() {
        assert!(is_valid_phone("+1 212 555 0199"));
        assert!(is_valid_phone("(212) 555-0199"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me maybe"));
    }

    #[test]
    fn address_validation_reports_each_field() {
        let errors = validate_address(&ShippingAddress::default());
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"firstName"));
        assert!(fields.contains(&"street"));
        assert!(fields.contains(&"zipcode"));

        assert!(validate_address(&address()).is_empty());
    }

    #[test]
    fn card_validation() {
        let valid = PaymentDetails::Card {
            number: "4242 4242 4242 4242".into(),
            holder: "Jane Doe".into(),
            expiry: "12/27".into(),
            cvc: "123".into(),
        };
        assert!(valid.validate().is_empty());

        let invalid = PaymentDetails::Card {
            number: "4242424242424242".into(),
            holder: " ".into(),
            expiry: "13/27".into(),
            cvc: "12".into(),
        };
        assert_eq!(invalid.validate().len(), 4);
    }

    #[test]
    fn upi_and_paypal_validation() {
        assert!(PaymentDetails::Upi { vpa: "jane@okbank".into() }.validate().is_empty());
        assert!(!PaymentDetails::Upi { vpa: "no-at-sign".into() }.validate().is_empty());

        assert!(
            PaymentDetails::Paypal { email: "jane@example.com".into() }
                .validate()
                .is_empty()
        );
        assert!(
            !PaymentDetails::Paypal { email: "jane@nodot".into() }
                .validate()
                .is_empty()
        );

        assert!(PaymentDetails::CashOnDelivery.validate().is_empty());
    }

    #[test]
    fn shipping_rates() {
        assert_eq!(ShippingMethod::Standard.rate(dec!(20)), Decimal::ZERO);
        assert_eq!(ShippingMethod::Standard.rate(dec!(80)), Decimal::ZERO);
        assert_eq!(ShippingMethod::Express.rate(dec!(80)), dec!(15.99));
        assert_eq!(ShippingMethod::Overnight.rate(dec!(80)), dec!(29.99));
    }

    #[test]
    fn expiry_format() {
        assert!(is_valid_expiry("01/26"));
        assert!(is_valid_expiry("12/30"));
        assert!(!is_valid_expiry("13/26"));
        assert!(!is_valid_expiry("1/26"));
        assert!(!is_valid_expiry("0126"));
    }

    fn test_flow(name: &str) -> CheckoutFlow {
        let config = crate::config::StorefrontConfig {
            user_service_url: "http://127.0.0.1:1".parse().unwrap(),
            catalog_service_url: "http://127.0.0.1:1".parse().unwrap(),
            cart_service_url: "http://127.0.0.1:1".parse().unwrap(),
            wishlist_service_url: "http://127.0.0.1:1".parse().unwrap(),
            session_file: std::env::temp_dir()
                .join(format!("meridian-checkout-{name}-{}.json", std::process::id())),
            request_timeout: std::time::Duration::from_millis(200),
        };
        let session = crate::session::SessionStore::new(config.session_file.clone());
        let user: meridian_core::User = serde_json::from_str(
            r#"{"id": 5, "username": "jdoe", "email": "jdoe@example.com",
                "firstName": "Jane", "lastName": "Doe"}"#,
        )
        .unwrap();
        let (_tx, auth_rx) = watch::channel(AuthState::logged_in(user, "tok".into()));
        let cart = CartStore::new(
            crate::api::CartApi::new(&config).unwrap(),
            session,
            auth_rx.clone(),
        );
        CheckoutFlow::new(cart, OrderApi::new(&config).unwrap(), auth_rx)
    }

    #[tokio::test]
    async fn cannot_submit_before_payment_step() {
        let mut flow = test_flow("early-submit");
        assert!(matches!(flow.submit().await, Err(CheckoutError::WrongStep)));
        assert_eq!(flow.step(), CheckoutStep::Address);
    }

    #[tokio::test]
    async fn address_step_gates_on_validation() {
        let mut flow = test_flow("gating");
        assert!(matches!(flow.next(), Err(CheckoutError::Invalid(_))));

        let mut bad = address();
        bad.zipcode = "x".into();
        flow.set_address(bad);
        assert!(matches!(flow.next(), Err(CheckoutError::Invalid(_))));

        flow.set_address(address());
        assert_eq!(flow.next().unwrap(), CheckoutStep::Shipping);
        assert_eq!(flow.next().unwrap(), CheckoutStep::Payment);
        assert!(matches!(flow.next(), Err(CheckoutError::WrongStep)));

        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Shipping);
    }

    #[tokio::test]
    async fn shipping_amount_is_the_method_rate_alone() {
        // Subtotal under the free-delivery threshold: the cart page
        // shows a 30 delivery charge, but the order carries only the
        // chosen method's rate.
        let mut flow = test_flow("shipping-amount");
        flow.set_address(address());
        assert_eq!(flow.cart.delivery_charge(), dec!(30));

        let request = flow.order_request("cod", address());
        assert_eq!(request.shipping_amount, Decimal::ZERO);

        flow.set_shipping_method(ShippingMethod::Express);
        let request = flow.order_request("cod", address());
        assert_eq!(request.shipping_amount, dec!(15.99));

        flow.set_shipping_method(ShippingMethod::Overnight);
        let request = flow.order_request("cod", address());
        assert_eq!(request.shipping_amount, dec!(29.99));
    }

    #[tokio::test]
    async fn rejected_submission_stays_on_payment() {
        let mut flow = test_flow("rejected");
        flow.set_address(address());
        flow.next().unwrap();
        flow.next().unwrap();
        flow.set_payment(PaymentDetails::CashOnDelivery);

        // Unreachable order service: the flow reports the failure and
        // keeps the payment step for a retry.
        assert!(matches!(
            flow.submit().await,
            Err(CheckoutError::Rejected(_))
        ));
        assert_eq!(flow.step(), CheckoutStep::Payment);
        assert!(flow.placed_order().is_none());
    }
}
