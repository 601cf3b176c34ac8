use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, SecondsFormat, Utc};

use super::{run_checks, with_checks, Check, Setter, ValueReq};
use crate::binding::Binding;
use crate::error::SetterError;

const UNITS: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
    ("d", 86_400_000_000_000),
];

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses a duration such as `1h30m`, `250ms` or `1.5s`.
///
/// A bare `0` is accepted; any other number needs a unit.
///
/// # Errors
///
/// Returns a description of the first malformed component.
///
/// # Examples
///
/// ```
/// use paramset::setter::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("the duration is empty".to_string());
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(format!("expected a number at '{rest}'"));
        }
        let number = &rest[..num_len];
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| {
                if unit.is_empty() {
                    format!("missing unit after '{number}'")
                } else {
                    format!("unknown unit '{unit}'")
                }
            })?;
        rest = &rest[unit_len..];

        let nanos = if number.contains('.') {
            let n: f64 = number
                .parse()
                .map_err(|_| format!("bad number '{number}'"))?;
            float_nanos(n, scale)
        } else {
            let n: u128 = number
                .parse()
                .map_err(|_| format!("bad number '{number}'"))?;
            n.checked_mul(scale)
                .ok_or_else(|| format!("'{number}{unit}' is too large"))?
        };
        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("'{s}' is too large"))?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| format!("'{s}' is too large"))?;
    #[allow(clippy::cast_possible_truncation)]
    let subsec = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, subsec))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn float_nanos(n: f64, scale: u128) -> u128 {
    (n * scale as f64).round() as u128
}

fn render_duration(d: Duration) -> String {
    if d.is_zero() {
        "0".to_string()
    } else if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ns", d.as_nanos())
    }
}

/// Sets a [`Duration`].
///
/// # Examples
///
/// ```
/// use paramset::setter::{DurationSetter, Setter};
/// use paramset::Binding;
/// use std::time::Duration;
///
/// let timeout = Binding::new(Duration::from_secs(5));
/// let mut setter = DurationSetter::new(&timeout);
/// setter.set_with_val("timeout", "2m").unwrap();
/// assert_eq!(timeout.get(), Duration::from_secs(120));
/// ```
pub struct DurationSetter {
    value: Binding<Duration>,
    checks: Vec<Check<Duration>>,
}

impl DurationSetter {
    /// A setter writing into `value`.
    #[must_use]
    pub fn new(value: &Binding<Duration>) -> Self {
        Self {
            value: value.clone(),
            checks: Vec::new(),
        }
    }

    /// Adds a check the parsed duration must pass.
    #[must_use]
    pub fn with_check(mut self, check: Check<Duration>) -> Self {
        self.checks.push(check);
        self
    }
}

impl Setter for DurationSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let parsed = parse_duration(value).map_err(|reason| SetterError::InvalidSyntax {
            value: value.to_string(),
            kind: "duration".to_string(),
            reason,
        })?;
        run_checks(&self.checks, &parsed, value)?;
        self.value.set(parsed);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        with_checks(
            "a duration such as 1h30m, 90s or 250ms (units: ns, us, ms, s, m, h, d)",
            self.checks.len(),
        )
    }

    fn current_value(&self) -> Option<String> {
        Some(render_duration(self.value.get()))
    }
}

/// Sets a timestamp from RFC 3339 text or a bare `YYYY-MM-DD` date (UTC
/// midnight).
pub struct TimeSetter {
    value: Binding<DateTime<FixedOffset>>,
}

impl TimeSetter {
    /// A setter writing into `value`.
    #[must_use]
    pub fn new(value: &Binding<DateTime<FixedOffset>>) -> Self {
        Self {
            value: value.clone(),
        }
    }
}

fn parse_time(s: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| "invalid time of day".to_string())?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc.fix()))
}

impl Setter for TimeSetter {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let parsed = parse_time(value).map_err(|reason| SetterError::InvalidSyntax {
            value: value.to_string(),
            kind: "time".to_string(),
            reason,
        })?;
        self.value.set(parsed);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        "an RFC 3339 timestamp (2024-05-01T12:00:00+01:00) or a date (2024-05-01)".to_string()
    }

    fn current_value(&self) -> Option<String> {
        Some(
            self.value
                .get()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }
}
