use crate::config::CurrencyDisplay;
use crate::decimal::Money;
use crate::errors::{PaymentError, Result};
use crate::metrics::DisplayMetrics;
use crate::types::PaymentMode;

/// check a typed amount against the cap for the active mode.
///
/// The inline check while typing and the check right before submission both
/// go through here. Returns the parsed amount on success.
pub fn validate_payment_amount(
    raw: &str,
    display: &DisplayMetrics,
    currency: &CurrencyDisplay,
) -> Result<Money> {
    let amount = match Money::parse(raw) {
        Some(amount) if amount.is_positive() => amount,
        _ => return Err(PaymentError::InvalidAmount),
    };

    if amount > display.max_amount {
        return Err(PaymentError::AmountExceedsMaximum {
            maximum: display.max_amount.format(currency),
        });
    }

    Ok(amount)
}

/// starting text of the amount field when a mode is entered.
/// custom mode starts empty so the full balance is never submitted by accident
pub fn initialize_amount(mode: PaymentMode, display: &DisplayMetrics) -> String {
    match mode {
        PaymentMode::DueToday => display.due_today.to_input_string(),
        PaymentMode::Custom => String::new(),
    }
}
