//! Money and tax-rate helpers built on rust_decimal
//!
//! Amounts travel as `f64` on the wire. All arithmetic is done in
//! `Decimal`, then rounded to 2 decimal places (half away from zero) when
//! converted back.

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is logged and treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole currency unit, half away from zero
#[inline]
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `price × quantity` in Decimal
#[inline]
pub fn line_total(price: f64, quantity: u32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Sum f64 amounts exactly
pub fn sum<I: IntoIterator<Item = f64>>(amounts: I) -> Decimal {
    amounts.into_iter().map(to_decimal).sum()
}

/// Format an amount with two decimals
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

/// A tax rate stored as a fraction (2.5% is `0.025`)
///
/// Records disagree on whether rates are stored as fractions or whole
/// percentages. Wire values are normalised on the way in: anything `>= 1`
/// is read as a percentage. Serialisation always writes the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaxRate(Decimal);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(Decimal::ZERO);

    /// Build from a fraction (0.025)
    pub fn from_fraction(fraction: Decimal) -> Self {
        Self(fraction.max(Decimal::ZERO))
    }

    /// Build from a whole percentage (2.5)
    pub fn from_percent(percent: Decimal) -> Self {
        Self::from_fraction(percent / Decimal::ONE_HUNDRED)
    }

    /// Build from a value of unknown representation
    pub fn from_wire(value: f64) -> Self {
        let value = to_decimal(value);
        if value >= Decimal::ONE {
            Self::from_percent(value)
        } else {
            Self::from_fraction(value)
        }
    }

    /// The rate as a fraction
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// The rate as a percentage, for display
    pub fn as_percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// `amount × rate`, unrounded
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount * self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

impl std::ops::Add for TaxRate {
    type Output = TaxRate;

    fn add(self, rhs: TaxRate) -> TaxRate {
        TaxRate(self.0 + rhs.0)
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TaxRate::from_wire(n)),
            Raw::Text(s) => {
                let trimmed = s.trim().trim_end_matches('%');
                if trimmed.is_empty() {
                    return Ok(TaxRate::ZERO);
                }
                trimmed
                    .parse::<f64>()
                    .map(TaxRate::from_wire)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_money(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
        assert_eq!(to_f64(Decimal::new(41999, 4)), 4.2);
    }

    #[test]
    fn test_round_to_unit() {
        assert_eq!(round_to_unit(Decimal::new(42005, 1)), Decimal::from(4201));
        assert_eq!(round_to_unit(Decimal::new(42004, 1)), Decimal::from(4200));
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_line_total_and_sum() {
        assert_eq!(line_total(100.0, 2), Decimal::from(200));
        assert_eq!(sum([0.1, 0.2]), Decimal::new(3, 1));
    }

    #[test]
    fn test_tax_rate_normalises_percent_and_fraction() {
        let fraction = TaxRate::from_wire(0.025);
        let percent = TaxRate::from_wire(2.5);
        assert_eq!(fraction, percent);
        assert_eq!(fraction.fraction(), Decimal::new(25, 3));
        assert_eq!(percent.as_percent(), Decimal::new(25, 1));
        assert_eq!(percent.to_string(), "2.5%");
        assert_eq!(TaxRate::from_wire(-1.0), TaxRate::ZERO);
    }

    #[test]
    fn test_tax_rate_apply() {
        let rate = TaxRate::from_wire(2.5);
        assert_eq!(rate.apply(Decimal::from(4000)), Decimal::from(100));
        assert_eq!((rate + rate).fraction(), Decimal::new(5, 2));
    }

    #[test]
    fn test_tax_rate_serde() {
        let rate: TaxRate = serde_json::from_str("6").unwrap();
        assert_eq!(rate.fraction(), Decimal::new(6, 2));
        let rate: TaxRate = serde_json::from_str("\"2.5%\"").unwrap();
        assert_eq!(rate.fraction(), Decimal::new(25, 3));
        assert_eq!(serde_json::to_string(&rate).unwrap(), "0.025");
    }
}
