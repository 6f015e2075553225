//! Typed hardware quantities.
//!
//! Configuration documents describe sizes, clocks, and voltages the way gem5
//! scripts do: as strings with a unit suffix (`"32kB"`, `"2GHz"`, `"1.0V"`).
//! This module parses them into:
//! 1. **`MemorySize`:** Capacity in bytes. `k`/`M`/`G`/`T` prefixes are binary multiples.
//! 2. **`Frequency`:** Clock rate in hertz, with a picosecond period for tick conversion.
//! 3. **`Voltage`:** Supply voltage held in millivolts.
//!
//! All three deserialize from either their string form or a bare integer in base units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValueParseError;

const KIB: u64 = 1 << 10;
const MIB: u64 = 1 << 20;
const GIB: u64 = 1 << 30;
const TIB: u64 = 1 << 40;

/// Picoseconds per second; gem5 ticks are one picosecond.
const PS_PER_SECOND: u64 = 1_000_000_000_000;

/// Raw document form of a quantity before unit parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Int(u64),
    Text(String),
}

/// Splits `"2.5GHz"` into `("2.5", "GHz")`.
fn split_quantity(input: &str) -> (&str, &str) {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    (number, suffix.trim())
}

/// Scales a decimal number by an integer multiplier, rejecting fractional results.
fn scale(
    quantity: &'static str,
    input: &str,
    number: &str,
    multiplier: u64,
) -> Result<u64, ValueParseError> {
    let invalid = |reason: &'static str| ValueParseError::Invalid {
        quantity,
        input: input.to_string(),
        reason,
    };

    if number.is_empty() {
        return Err(invalid("missing numeric value"));
    }
    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| invalid("value overflows 64 bits"));
    }

    let value: f64 = number.parse().map_err(|_| invalid("malformed number"))?;
    let scaled = value * multiplier as f64;
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return Err(invalid("value overflows 64 bits"));
    }
    if scaled.fract() != 0.0 {
        return Err(invalid("value is not a whole number of base units"));
    }
    Ok(scaled as u64)
}

/// Memory capacity in bytes.
///
/// # Examples
///
/// ```
/// use memhier_core::common::MemorySize;
///
/// let size: MemorySize = "256kB".parse().unwrap();
/// assert_eq!(size.bytes(), 256 * 1024);
/// assert_eq!(size.to_string(), "256KiB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "QuantityRepr", into = "u64")]
pub struct MemorySize(u64);

impl MemorySize {
    /// Creates a size from a byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Creates a size from a count of KiB.
    pub const fn from_kib(kib: u64) -> Self {
        Self(kib * KIB)
    }

    /// Creates a size from a count of MiB.
    pub const fn from_mib(mib: u64) -> Self {
        Self(mib * MIB)
    }

    /// Returns the size in bytes.
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for MemorySize {
    type Err = ValueParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (number, suffix) = split_quantity(input);
        let multiplier = match suffix {
            "" | "B" => 1,
            "k" | "K" | "kB" | "KB" | "KiB" => KIB,
            "M" | "MB" | "MiB" => MIB,
            "G" | "GB" | "GiB" => GIB,
            "T" | "TB" | "TiB" => TIB,
            _ => {
                return Err(ValueParseError::Invalid {
                    quantity: "memory size",
                    input: input.to_string(),
                    reason: "unknown unit suffix",
                });
            }
        };
        scale("memory size", input, number, multiplier).map(Self)
    }
}

impl TryFrom<QuantityRepr> for MemorySize {
    type Error = ValueParseError;

    fn try_from(repr: QuantityRepr) -> Result<Self, Self::Error> {
        match repr {
            QuantityRepr::Int(bytes) => Ok(Self(bytes)),
            QuantityRepr::Text(text) => text.parse(),
        }
    }
}

impl From<MemorySize> for u64 {
    fn from(size: MemorySize) -> Self {
        size.0
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        for (unit, name) in [(TIB, "TiB"), (GIB, "GiB"), (MIB, "MiB"), (KIB, "KiB")] {
            if bytes >= unit && bytes % unit == 0 {
                return write!(f, "{}{name}", bytes / unit);
            }
        }
        write!(f, "{bytes}B")
    }
}

/// Clock frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "QuantityRepr", into = "u64")]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a frequency from a count of hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a count of megahertz.
    pub const fn from_mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    /// Returns the frequency in hertz.
    pub const fn hz(self) -> u64 {
        self.0
    }

    /// Clock period in picosecond ticks, rounded to the nearest tick.
    ///
    /// Returns `None` for a zero frequency.
    pub const fn period_ticks(self) -> Option<u64> {
        if self.0 == 0 {
            None
        } else {
            Some((PS_PER_SECOND + self.0 / 2) / self.0)
        }
    }
}

impl FromStr for Frequency {
    type Err = ValueParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (number, suffix) = split_quantity(input);
        let multiplier = match suffix {
            "" | "Hz" => 1,
            "kHz" | "KHz" => 1_000,
            "MHz" => 1_000_000,
            "GHz" => 1_000_000_000,
            "THz" => 1_000_000_000_000,
            _ => {
                return Err(ValueParseError::Invalid {
                    quantity: "frequency",
                    input: input.to_string(),
                    reason: "unknown unit suffix",
                });
            }
        };
        let hz = scale("frequency", input, number, multiplier)?;
        if hz == 0 {
            return Err(ValueParseError::Invalid {
                quantity: "frequency",
                input: input.to_string(),
                reason: "frequency must be non-zero",
            });
        }
        Ok(Self(hz))
    }
}

impl TryFrom<QuantityRepr> for Frequency {
    type Error = ValueParseError;

    fn try_from(repr: QuantityRepr) -> Result<Self, Self::Error> {
        match repr {
            QuantityRepr::Int(hz) => Ok(Self(hz)),
            QuantityRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Frequency> for u64 {
    fn from(freq: Frequency) -> Self {
        freq.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        for (unit, name) in [(1_000_000_000, "GHz"), (1_000_000, "MHz"), (1_000, "kHz")] {
            if hz >= unit && hz % unit == 0 {
                return write!(f, "{}{name}", hz / unit);
            }
        }
        write!(f, "{hz}Hz")
    }
}

/// Supply voltage, stored in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "QuantityRepr", into = "u64")]
pub struct Voltage(u64);

impl Voltage {
    /// Creates a voltage from a count of millivolts.
    pub const fn from_millivolts(mv: u64) -> Self {
        Self(mv)
    }

    /// Returns the voltage in millivolts.
    pub const fn millivolts(self) -> u64 {
        self.0
    }
}

impl FromStr for Voltage {
    type Err = ValueParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (number, suffix) = split_quantity(input);
        let multiplier = match suffix {
            "" | "V" => 1_000,
            "mV" => 1,
            _ => {
                return Err(ValueParseError::Invalid {
                    quantity: "voltage",
                    input: input.to_string(),
                    reason: "unknown unit suffix",
                });
            }
        };
        scale("voltage", input, number, multiplier).map(Self)
    }
}

impl TryFrom<QuantityRepr> for Voltage {
    type Error = ValueParseError;

    fn try_from(repr: QuantityRepr) -> Result<Self, Self::Error> {
        match repr {
            QuantityRepr::Int(mv) => Ok(Self(mv)),
            QuantityRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Voltage> for u64 {
    fn from(voltage: Voltage) -> Self {
        voltage.0
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}V", self.0 / 1_000, self.0 % 1_000)
    }
}
