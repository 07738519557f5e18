//! Major/minor currency unit conversion.
//!
//! Amounts arrive from clients in major units (rupees) as JSON numbers and
//! leave for the gateway as integer minor units (paise).

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// Largest supported minor-unit exponent. Real currencies use at most 3.
pub const MAX_MINOR_UNIT_EXPONENT: u32 = 4;

/// Currency the service charges in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code sent to the gateway
    pub code: String,
    /// Digits after the decimal point; minor = major * 10^exponent
    pub minor_unit_exponent: u32,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            code: "INR".to_string(),
            minor_unit_exponent: 2,
        }
    }
}

impl Currency {
    /// Multiplier from major to minor units, `None` when the exponent is
    /// above [`MAX_MINOR_UNIT_EXPONENT`].
    pub fn minor_unit_factor(&self) -> Option<Decimal> {
        if self.minor_unit_exponent > MAX_MINOR_UNIT_EXPONENT {
            return None;
        }
        10u64.checked_pow(self.minor_unit_exponent).map(Decimal::from)
    }

    /// Convert a client-supplied major-unit amount to minor units.
    ///
    /// Rounds half away from zero. Rejects non-positive amounts and amounts
    /// that round to zero minor units.
    pub fn to_minor_units(&self, major: Decimal) -> Result<u64, PaymentError> {
        if major <= Decimal::ZERO {
            return Err(PaymentError::invalid_argument("Amount must be positive"));
        }

        let factor = self.minor_unit_factor().ok_or_else(|| {
            tracing::error!(
                "Currency {} has unsupported minor_unit_exponent {}",
                self.code,
                self.minor_unit_exponent
            );
            PaymentError::Internal("Currency is misconfigured.")
        })?;

        let minor = major
            .checked_mul(factor)
            .ok_or_else(|| PaymentError::invalid_argument("Amount is too large"))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        match minor.to_u64() {
            Some(0) => Err(PaymentError::invalid_argument(
                "Amount is below the smallest currency unit",
            )),
            Some(v) => Ok(v),
            None => Err(PaymentError::invalid_argument("Amount is too large")),
        }
    }
}

/// Parse a JSON number into a Decimal without going through f64 arithmetic.
///
/// `serde_json::Number` prints floats in their shortest round-trip form, so
/// `12.34` stays `12.34` rather than `12.339999...`.
pub fn parse_amount(n: &serde_json::Number) -> Result<Decimal, PaymentError> {
    let s = n.to_string();
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .map_err(|_| PaymentError::invalid_argument("Amount must be a number"))
}
