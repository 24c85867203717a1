//! Stub payment-detail validation.
//!
//! No gateway is integrated; these checks only catch obviously malformed
//! input before an order is placed.

use chrono::{Datelike, Utc};
use thiserror::Error;

/// A payment detail failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PaymentValidationError(pub &'static str);

/// Validates card number, expiry (`MM/YY`), and CVV.
pub fn validate_card_details(
    card_number: &str,
    expiry: &str,
    cvv: &str,
) -> Result<(), PaymentValidationError> {
    let card_number: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();

    if card_number.len() != 16 || !card_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(PaymentValidationError("Card number must be 16 digits"));
    }

    let (month, year) = parse_expiry(expiry)?;
    if !(1..=12).contains(&month) {
        return Err(PaymentValidationError("Invalid month"));
    }

    let now = Utc::now();
    let current_year = now.year() % 100;
    let current_month = now.month() as i32;
    if (year, month) < (current_year, current_month) {
        return Err(PaymentValidationError("Card expired"));
    }

    if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(PaymentValidationError("CVV must be 3 digits"));
    }

    Ok(())
}

fn parse_expiry(expiry: &str) -> Result<(i32, i32), PaymentValidationError> {
    let malformed = PaymentValidationError("Expiry date format should be MM/YY");
    if expiry.len() != 5 {
        return Err(malformed);
    }
    let (Some(month), Some("/"), Some(year)) =
        (expiry.get(..2), expiry.get(2..3), expiry.get(3..))
    else {
        return Err(malformed);
    };

    let month: i32 = month.parse().map_err(|_| malformed.clone())?;
    let year: i32 = year.parse().map_err(|_| malformed)?;
    Ok((month, year))
}

/// Validates a PayPal email address shape.
pub fn validate_paypal_email(email: &str) -> Result<(), PaymentValidationError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(host), None) if !local.is_empty() && !host.is_empty() => Ok(()),
        _ => Err(PaymentValidationError("Invalid PayPal email format")),
    }
}

/// Validates a GPay phone number: at least 10 digits after stripping
/// formatting characters.
pub fn validate_gpay_phone(phone: &str) -> Result<(), PaymentValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 10 {
        return Err(PaymentValidationError(
            "Phone number must be at least 10 digits",
        ));
    }
    Ok(())
}
