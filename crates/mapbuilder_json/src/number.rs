use std::fmt;

/// Largest mantissa a decimal may hold (2^96 - 1).
const DECIMAL_MAX_MANTISSA: i128 = 79_228_162_514_264_337_593_543_950_335;
/// Largest number of fractional digits a decimal may carry.
const DECIMAL_MAX_SCALE: usize = 28;

/// Fixed-point decimal: `mantissa * 10^-scale`.
///
/// Only exact representations are accepted: no exponent, at most 28
/// fractional digits and a mantissa that fits in 96 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u32) -> Option<Self> {
        if mantissa.abs() > DECIMAL_MAX_MANTISSA || scale as usize > DECIMAL_MAX_SCALE {
            return None;
        }
        Some(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn parse(text: &str) -> Option<Self> {
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        // Trailing fractional zeros carry no value, drop them only if needed to fit the scale.
        let mut frac = frac_part;
        while frac.len() > DECIMAL_MAX_SCALE && frac.ends_with('0') {
            frac = &frac[..frac.len() - 1];
        }
        if frac.len() > DECIMAL_MAX_SCALE {
            return None;
        }

        let digits: String = int_part.chars().chain(frac.chars()).collect();
        let significant = digits.trim_start_matches('0');
        if significant.len() > 29 {
            return None;
        }
        let magnitude: i128 = if significant.is_empty() { 0 } else { significant.parse().ok()? };
        let mantissa = if negative { -magnitude } else { magnitude };
        Self::new(mantissa, frac.len() as u32)
    }

    /// Returns the value as an integer when it has no fractional part.
    pub fn to_i128(&self) -> Option<i128> {
        let divisor = 10i128.pow(self.scale);
        if self.mantissa % divisor == 0 {
            Some(self.mantissa / divisor)
        } else {
            None
        }
    }

    pub fn to_f64(&self) -> f64 {
        // Going through the decimal text keeps the conversion correctly rounded.
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    }
}

/// A JSON number, stored in the narrowest type that represents it exactly.
#[derive(Debug, Clone, Copy)]
pub enum JsonNumber {
    Int32(i32),
    Int64(i64),
    Decimal(Decimal),
    Double(f64),
}

impl JsonNumber {
    /// Resolves a numeric literal: int32, then int64, then decimal, then double.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(v) = text.parse::<i32>() {
            return Some(JsonNumber::Int32(v));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Some(JsonNumber::Int64(v));
        }
        if let Some(d) = Decimal::parse(text) {
            return Some(JsonNumber::Decimal(d));
        }
        match text {
            "NaN" => return Some(JsonNumber::Double(f64::NAN)),
            "Infinity" | "+Infinity" => return Some(JsonNumber::Double(f64::INFINITY)),
            "-Infinity" => return Some(JsonNumber::Double(f64::NEG_INFINITY)),
            _ => {}
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(JsonNumber::Double(v)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            JsonNumber::Int32(v) => *v as f64,
            JsonNumber::Int64(v) => *v as f64,
            JsonNumber::Decimal(d) => d.to_f64(),
            JsonNumber::Double(v) => *v,
        }
    }

    /// Integral value, if the number has no fractional part.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            JsonNumber::Int32(v) => Some(*v as i128),
            JsonNumber::Int64(v) => Some(*v as i128),
            JsonNumber::Decimal(d) => d.to_i128(),
            JsonNumber::Double(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e38 {
                    Some(*v as i128)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    pub fn is_finite(&self) -> bool {
        match self {
            JsonNumber::Double(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNumber::Int32(v) => write!(f, "{v}"),
            JsonNumber::Int64(v) => write!(f, "{v}"),
            JsonNumber::Decimal(d) => write!(f, "{d}"),
            JsonNumber::Double(v) => {
                if v.is_nan() {
                    f.write_str("NaN")
                } else if v.is_infinite() {
                    f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    write!(f, "{v}")
                }
            }
        }
    }
}

impl From<i32> for JsonNumber {
    fn from(v: i32) -> Self {
        JsonNumber::Int32(v)
    }
}

impl From<i64> for JsonNumber {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(small) => JsonNumber::Int32(small),
            Err(_) => JsonNumber::Int64(v),
        }
    }
}

impl From<f64> for JsonNumber {
    fn from(v: f64) -> Self {
        JsonNumber::Double(v)
    }
}
