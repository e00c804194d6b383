use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{PaymentError, Result};
use crate::types::PaymentMethod;

/// engine configuration, injected into every component that needs settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub currency: CurrencyDisplay,
    pub reference: ReferenceConfig,
    pub calendar: CalendarConfig,
    pub payment_defaults: PaymentDefaults,
}

/// how amounts are rendered in messages and views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDisplay {
    pub code: String,
    pub symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: Option<char>,
}

/// client-side payment reference generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub prefix: String,
    pub suffix_len: usize,
}

/// which calendar day "today" is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// offset from UTC, in minutes, of the business day used for due-date
    /// comparison (e.g. 60 for West Africa Time)
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDefaults {
    pub method: PaymentMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyDisplay::default(),
            reference: ReferenceConfig::default(),
            calendar: CalendarConfig::default(),
            payment_defaults: PaymentDefaults::default(),
        }
    }
}

impl Default for CurrencyDisplay {
    fn default() -> Self {
        Self {
            code: "NGN".to_string(),
            symbol: "₦".to_string(),
            decimal_places: 2,
            thousands_separator: Some(','),
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            prefix: "PAY".to_string(),
            suffix_len: 8,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
        }
    }
}

impl Default for PaymentDefaults {
    fn default() -> Self {
        Self {
            method: PaymentMethod::Cash,
        }
    }
}

impl CalendarConfig {
    /// calendar day of an instant in the business timezone
    pub fn business_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        (instant + Duration::minutes(self.utc_offset_minutes as i64)).date_naive()
    }
}

impl EngineConfig {
    /// configuration for a currency with the usual two decimal places
    pub fn for_currency(code: &str, symbol: &str) -> Self {
        Self {
            currency: CurrencyDisplay {
                code: code.to_string(),
                symbol: symbol.to_string(),
                ..CurrencyDisplay::default()
            },
            ..Self::default()
        }
    }

    /// set the business-day offset from UTC
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.calendar.utc_offset_minutes = minutes;
        self
    }

    /// check values that would produce nonsense downstream
    pub fn validate(&self) -> Result<()> {
        if self.currency.code.trim().is_empty() {
            return Err(PaymentError::InvalidConfiguration {
                message: "currency code must not be empty".to_string(),
            });
        }
        if self.currency.decimal_places > 8 {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "decimal places {} exceeds supported precision of 8",
                    self.currency.decimal_places
                ),
            });
        }
        if self.reference.prefix.trim().is_empty() {
            return Err(PaymentError::InvalidConfiguration {
                message: "reference prefix must not be empty".to_string(),
            });
        }
        if self.reference.suffix_len == 0 || self.reference.suffix_len > 32 {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "reference suffix length must be between 1 and 32, got {}",
                    self.reference.suffix_len
                ),
            });
        }
        // real-world offsets stay within +/- 14 hours
        if self.calendar.utc_offset_minutes.abs() > 14 * 60 {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "utc offset {} minutes is out of range",
                    self.calendar.utc_offset_minutes
                ),
            });
        }
        Ok(())
    }

    /// parse and validate from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| PaymentError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// serialize to pretty json
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PaymentError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    /// load settings from a json file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| PaymentError::InvalidConfiguration {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), currency = %config.currency.code, "loaded engine config");
        Ok(config)
    }

    /// persist settings to a json file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| PaymentError::InvalidConfiguration {
            message: format!("failed to write {}: {}", path.display(), e),
        })?;
        tracing::debug!(path = %path.display(), "saved engine config");
        Ok(())
    }
}
