//! Checkout form handling.
//!
//! No payment is taken. The form is validated for completeness, card fields
//! are wrapped in [`SecretString`] so they never reach logs, and placing an
//! order simply clears the cart after a short processing delay (see
//! [`crate::widget::Widget::place_order`]).

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Reasons an order cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Unsupported country: {0}")]
    UnknownCountry(String),
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Your order is already being processed")]
    AlreadyProcessing,
    #[error("No order has been submitted")]
    NotSubmitted,
}

/// Countries offered in the shipping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    UnitedStates,
    Canada,
    UnitedKingdom,
    Australia,
    Pakistan,
}

impl Country {
    pub const ALL: [Self; 5] = [
        Self::UnitedStates,
        Self::Canada,
        Self::UnitedKingdom,
        Self::Australia,
        Self::Pakistan,
    ];

    /// Form option value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnitedStates => "us",
            Self::Canada => "ca",
            Self::UnitedKingdom => "uk",
            Self::Australia => "au",
            Self::Pakistan => "pk",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::Canada => "Canada",
            Self::UnitedKingdom => "United Kingdom",
            Self::Australia => "Australia",
            Self::Pakistan => "Pakistan",
        }
    }
}

impl FromStr for Country {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| CheckoutError::UnknownCountry(s.trim().to_owned()))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw checkout form input, as submitted.
///
/// Implements `Debug` manually to redact card fields.
#[derive(Clone, Default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("postal_code", &self.postal_code)
            .field("country", &self.country)
            .field("card_name", &self.card_name)
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl CheckoutForm {
    /// Check that every field is filled in and well-formed.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<CheckoutDetails, CheckoutError> {
        let first_name = required(&self.first_name, "First Name")?;
        let last_name = required(&self.last_name, "Last Name")?;
        let email = required(&self.email, "Email")?;
        validate_email(&email)?;
        let address = required(&self.address, "Address")?;
        let city = required(&self.city, "City")?;
        let postal_code = required(&self.postal_code, "Postal Code")?;
        let country = required(&self.country, "Country")?.parse::<Country>()?;
        let card_name = required(&self.card_name, "Name on Card")?;
        let card_number = required(&self.card_number, "Card Number")?;
        let expiry = required(&self.expiry, "Expiry Date")?;
        let cvv = required(&self.cvv, "CVV")?;

        Ok(CheckoutDetails {
            first_name,
            last_name,
            email,
            address,
            city,
            postal_code,
            country,
            card_name,
            card_number: SecretString::from(card_number),
            expiry,
            cvv: SecretString::from(cvv),
        })
    }
}

/// A complete checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: Country,
    pub card_name: String,
    pub card_number: SecretString,
    pub expiry: String,
    pub cvv: SecretString,
}

impl CheckoutDetails {
    /// Last four digits of the card number, for receipts.
    #[must_use]
    pub fn card_last4(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits
            .iter()
            .skip(digits.len().saturating_sub(4))
            .collect()
    }
}

/// Summary of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub placed_at: DateTime<Utc>,
    pub email: String,
    pub item_count: u32,
    pub total: Decimal,
}

fn required(value: &str, label: &'static str) -> Result<String, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CheckoutError::MissingField(label))
    } else {
        Ok(value.to_owned())
    }
}

fn validate_email(email: &str) -> Result<(), CheckoutError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CheckoutError::InvalidEmail),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn filled_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 St James's Square".to_string(),
            city: "London".to_string(),
            postal_code: "SW1Y 4JH".to_string(),
            country: "uk".to_string(),
            card_name: "A Lovelace".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let details = filled_form().validate().unwrap();
        assert_eq!(details.country, Country::UnitedKingdom);
        assert_eq!(details.card_last4(), "4242");
    }

    #[test]
    fn test_missing_field_reports_first_in_order() {
        let form = CheckoutForm {
            last_name: "  ".to_string(),
            city: String::new(),
            ..filled_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            CheckoutError::MissingField("Last Name")
        );
    }

    #[test]
    fn test_invalid_email() {
        for email in ["ada", "@example.com", "ada@", "a@b@c"] {
            let form = CheckoutForm {
                email: email.to_string(),
                ..filled_form()
            };
            assert_eq!(form.validate().unwrap_err(), CheckoutError::InvalidEmail);
        }
    }

    #[test]
    fn test_country_codes() {
        assert_eq!("PK".parse::<Country>().unwrap(), Country::Pakistan);
        assert_eq!(
            "fr".parse::<Country>().unwrap_err(),
            CheckoutError::UnknownCountry("fr".to_string())
        );
        assert_eq!(Country::Canada.to_string(), "Canada");
    }

    #[test]
    fn test_debug_redacts_card() {
        let debug = format!("{:?}", filled_form());
        assert!(!debug.contains("4242"));
        assert!(!debug.contains("123\""));
        assert!(debug.contains("[REDACTED]"));
    }
}
