//! Coordinate and flag tokens as stored in `db.xml`.
//!
//! Coordinates are written as `x,y`. Grid sizes and offsets are always
//! written as integers, brush sizes as floats with four significant digits.
//! Flags are the literal tokens `on` and `off`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FgError, Result};

/// Token for an enabled flag.
pub const FLAG_ON: &str = "on";
/// Token for a disabled flag.
pub const FLAG_OFF: &str = "off";

/// A two-dimensional numeric pair.
///
/// Both components share a kind: a pair read as `100,100` is `Int`,
/// a pair read as `10.5,10` is `Float`. In sidecar JSON a pair is a
/// two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pair {
    Int([i64; 2]),
    Float([f64; 2]),
}

impl Pair {
    pub fn int(x: i64, y: i64) -> Self {
        Pair::Int([x, y])
    }

    pub fn float(x: f64, y: f64) -> Self {
        Pair::Float([x, y])
    }

    /// Components as floats, regardless of kind.
    pub fn as_f64(&self) -> (f64, f64) {
        match *self {
            Pair::Int([x, y]) => (x as f64, y as f64),
            Pair::Float([x, y]) => (x, y),
        }
    }

    /// Components as integers; float components are truncated toward zero.
    pub fn as_i64(&self) -> (i64, i64) {
        match *self {
            Pair::Int([x, y]) => (x, y),
            Pair::Float([x, y]) => (x as i64, y as i64),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pair::Int(_) => f.write_str(&encode_int_pair(self)),
            Pair::Float(_) => f.write_str(&encode_float_pair(self)),
        }
    }
}

/// Parse an `x,y` token.
///
/// Both components are parsed as integers when possible, otherwise both
/// are parsed as floats.
pub fn decode_pair(field: &str, text: &str) -> Result<Pair> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| FgError::format(field, text))?;
    let (x, y) = (x.trim(), y.trim());

    if let (Ok(x), Ok(y)) = (x.parse::<i64>(), y.parse::<i64>()) {
        return Ok(Pair::int(x, y));
    }

    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) => Ok(Pair::float(x, y)),
        _ => Err(FgError::format(field, text)),
    }
}

/// Format a pair as `x,y` integers.
pub fn encode_int_pair(pair: &Pair) -> String {
    let (x, y) = pair.as_i64();
    format!("{},{}", x, y)
}

/// Format a pair as `x,y` with four significant digits per component.
pub fn encode_float_pair(pair: &Pair) -> String {
    let (x, y) = pair.as_f64();
    format!("{},{}", format_significant(x), format_significant(y))
}

/// Parse an `on`/`off` token.
pub fn decode_flag(field: &str, token: &str) -> Result<bool> {
    match token.trim() {
        FLAG_ON => Ok(true),
        FLAG_OFF => Ok(false),
        _ => Err(FgError::format(field, token)),
    }
}

pub fn encode_flag(value: bool) -> &'static str {
    if value {
        FLAG_ON
    } else {
        FLAG_OFF
    }
}

const SIGNIFICANT_DIGITS: i32 = 4;

/// General-format a float with four significant digits.
///
/// Trailing zeros are dropped, and values outside `1e-4 <= |v| < 1e4`
/// switch to scientific notation (`1.235e+04`).
fn format_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Let the formatter round first so the exponent reflects the rounded value.
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
