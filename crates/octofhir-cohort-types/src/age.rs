//! Age arithmetic
//!
//! Ages are counted in completed units between a birth date and a reference
//! date: a patient born on 2010-06-15 is 13 years old on 2024-06-14 and 14
//! on 2024-06-15.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit of an age quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeError {
    #[error("Unknown duration unit: {0}")]
    UnknownUnit(String),

    #[error("Invalid age quantity: {0}")]
    InvalidQuantity(String),
}

impl FromStr for DurationUnit {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" | "years" | "a" => Ok(Self::Years),
            "month" | "months" | "mo" => Ok(Self::Months),
            "week" | "weeks" | "wk" => Ok(Self::Weeks),
            "day" | "days" | "d" => Ok(Self::Days),
            other => Err(AgeError::UnknownUnit(other.to_string())),
        }
    }
}

/// An age bound: a non-negative quantity of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Age {
    pub quantity: u32,
    pub unit: DurationUnit,
}

impl Age {
    pub const fn new(quantity: u32, unit: DurationUnit) -> Self {
        Self { quantity, unit }
    }

    pub const fn years(quantity: u32) -> Self {
        Self::new(quantity, DurationUnit::Years)
    }

    pub const fn months(quantity: u32) -> Self {
        Self::new(quantity, DurationUnit::Months)
    }

    /// Completed units of `unit` between `birth` and `at`.
    ///
    /// Returns `None` when `at` precedes `birth`.
    pub fn completed(birth: NaiveDate, at: NaiveDate, unit: DurationUnit) -> Option<i64> {
        if at < birth {
            return None;
        }
        let value = match unit {
            DurationUnit::Years => completed_months(birth, at) / 12,
            DurationUnit::Months => completed_months(birth, at),
            DurationUnit::Weeks => (at - birth).num_days() / 7,
            DurationUnit::Days => (at - birth).num_days(),
        };
        Some(value)
    }

    /// Whether someone born on `birth` has reached this age on `at`
    pub fn is_reached(&self, birth: NaiveDate, at: NaiveDate) -> bool {
        Self::completed(birth, at, self.unit).is_some_and(|n| n >= i64::from(self.quantity))
    }

    /// Whether someone born on `birth` is still within this age on `at`,
    /// i.e. has not completed `quantity + 1` units.
    pub fn is_not_exceeded(&self, birth: NaiveDate, at: NaiveDate) -> bool {
        Self::completed(birth, at, self.unit).is_some_and(|n| n <= i64::from(self.quantity))
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.unit)
    }
}

impl FromStr for Age {
    type Err = AgeError;

    /// Parse `"14 years"`, `"18 months"` or `"14y"`-style shorthand
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| AgeError::InvalidQuantity(s.to_string()))?;
        let (number, unit) = s.split_at(split);
        let quantity = number
            .parse::<u32>()
            .map_err(|_| AgeError::InvalidQuantity(s.to_string()))?;
        let unit = match unit.trim() {
            "y" => DurationUnit::Years,
            "m" => DurationUnit::Months,
            "w" => DurationUnit::Weeks,
            other => other.parse()?,
        };
        Ok(Self::new(quantity, unit))
    }
}

fn completed_months(birth: NaiveDate, at: NaiveDate) -> i64 {
    let mut months = i64::from(at.year() - birth.year()) * 12
        + i64::from(at.month()) - i64::from(birth.month());
    if at.day() < birth.day() {
        months -= 1;
    }
    months
}
