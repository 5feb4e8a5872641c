//! Presentation formatting for summary cards and table cells.
//!
//! Fixed-point output follows JavaScript's `Number.prototype.toFixed` so the
//! numbers match what the analysis service's web front end has always shown:
//! the exact binary value is rounded and ties go away from zero (Rust's own
//! `{:.N}` rounds ties to even).

use serde_json::Value;

/// Placeholder for missing or non-numeric values.
pub const MISSING: &str = "—";

/// Cells with an absolute value strictly inside this range render as percentages.
const PCT_LOWER: f64 = 0.0001;
const PCT_UPPER: f64 = 1.0;

/// Generic table cell: small fractions as percentages, other numbers with two decimals.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => format_cell_f64(v),
            None => n.to_string(),
        },
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            // Numeric text still gets the percentage treatment; anything
            // else prints as sent.
            Ok(v) if in_pct_range(v) => format!("{}%", to_fixed(v * 100.0, 1)),
            _ => s.clone(),
        },
        Some(other) => other.to_string(),
    }
}

fn in_pct_range(v: f64) -> bool {
    v.abs() < PCT_UPPER && v.abs() > PCT_LOWER
}

pub fn format_cell_f64(v: f64) -> String {
    if v.is_nan() {
        return MISSING.to_string();
    }
    if in_pct_range(v) {
        return format!("{}%", to_fixed(v * 100.0, 1));
    }
    to_fixed(v, 2)
}

/// Fraction rendered as a one-decimal percentage.
pub fn format_pct(value: Option<&Value>) -> String {
    numeric(value).map_or(MISSING.to_string(), format_pct_f64)
}

pub fn format_pct_f64(v: f64) -> String {
    if v.is_nan() {
        return MISSING.to_string();
    }
    format!("{}%", to_fixed(v * 100.0, 1))
}

/// Number with a fixed count of decimals, placeholder when absent.
pub fn format_fixed(value: Option<&Value>, digits: usize) -> String {
    match numeric(value) {
        Some(v) if !v.is_nan() => to_fixed(v, digits),
        _ => MISSING.to_string(),
    }
}

/// Dollar amount with two decimals.
pub fn format_usd(value: Option<&Value>) -> String {
    match numeric(value) {
        Some(v) if !v.is_nan() => format_usd_f64(v),
        _ => MISSING.to_string(),
    }
}

pub fn format_usd_f64(v: f64) -> String {
    format!("${}", to_fixed(v, 2))
}

/// Row label (Metric / Scenario): strings verbatim, null as blank.
pub fn format_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// `Number.prototype.toFixed` for `digits` decimals.
pub fn to_fixed(v: f64, digits: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // -0 prints without a sign.
    let v = if v == 0.0 { 0.0 } else { v };

    let exact = format!("{:.*}", exact_fraction_digits(v), v.abs());
    let (int_part, frac_part) = match exact.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (exact, String::new()),
    };

    // Digits kept, padded out to the requested precision.
    let mut kept: Vec<u8> = int_part.bytes().collect();
    let frac_bytes = frac_part.as_bytes();
    for i in 0..digits {
        kept.push(*frac_bytes.get(i).unwrap_or(&b'0'));
    }
    let round_up = frac_bytes.get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        increment_decimal(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if v < 0.0 {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&kept[..split]).unwrap_or("0"));
    if digits > 0 {
        out.push('.');
        out.push_str(std::str::from_utf8(&kept[split..]).unwrap_or(""));
    }
    out
}

/// Number of fractional decimal digits needed to print `v` exactly.
fn exact_fraction_digits(v: f64) -> usize {
    let bits = v.abs().to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let mut mantissa = bits & ((1u64 << 52) - 1);
    let mut exp = if biased_exp == 0 {
        -1074
    } else {
        mantissa |= 1u64 << 52;
        biased_exp - 1075
    };
    if mantissa == 0 {
        return 0;
    }
    exp += mantissa.trailing_zeros() as i32;
    if exp >= 0 {
        0
    } else {
        (-exp) as usize
    }
}

/// Add one unit in the last place of an ASCII digit string, carrying leftwards.
fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
