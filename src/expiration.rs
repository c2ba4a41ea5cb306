//! Expiration policy: computing, classifying, and describing paste expiry.
//!
//! Expiry is computed from `expires_at`, never tracked. Enforcement is lazy
//! and happens in the read path of [`crate::service::PasteService`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PasteError, Result};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
/// Months are a flat 30 days; no calendar awareness.
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Lifetime choices offered at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpirationOption {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "custom")]
    Custom,
}

impl ExpirationOption {
    pub const ALL: [ExpirationOption; 6] = [
        ExpirationOption::OneHour,
        ExpirationOption::OneDay,
        ExpirationOption::OneWeek,
        ExpirationOption::OneMonth,
        ExpirationOption::Never,
        ExpirationOption::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationOption::OneHour => "1h",
            ExpirationOption::OneDay => "1d",
            ExpirationOption::OneWeek => "1w",
            ExpirationOption::OneMonth => "1m",
            ExpirationOption::Never => "never",
            ExpirationOption::Custom => "custom",
        }
    }

    /// Human label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            ExpirationOption::OneHour => "1 Hour",
            ExpirationOption::OneDay => "1 Day",
            ExpirationOption::OneWeek => "1 Week",
            ExpirationOption::OneMonth => "1 Month",
            ExpirationOption::Never => "Never",
            ExpirationOption::Custom => "Custom...",
        }
    }

    /// Fixed offset for the preset options.
    fn offset_secs(&self) -> Option<i64> {
        match self {
            ExpirationOption::OneHour => Some(HOUR),
            ExpirationOption::OneDay => Some(DAY),
            ExpirationOption::OneWeek => Some(WEEK),
            ExpirationOption::OneMonth => Some(MONTH),
            ExpirationOption::Never | ExpirationOption::Custom => None,
        }
    }
}

impl fmt::Display for ExpirationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpirationOption {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|opt| opt.as_str() == s)
            .ok_or_else(|| PasteError::Validation(format!("unknown expiration option: {s}")))
    }
}

/// Units accepted for a custom duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    fn secs(&self) -> i64 {
        match self {
            DurationUnit::Minutes => MINUTE,
            DurationUnit::Hours => HOUR,
            DurationUnit::Days => DAY,
            DurationUnit::Weeks => WEEK,
            DurationUnit::Months => MONTH,
            DurationUnit::Years => YEAR,
        }
    }
}

/// The three mutually exclusive lifecycle states of a stored paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationState {
    /// Has an expiry that is still in the future.
    Active,
    /// Expiry is in the past.
    Expired,
    /// No expiry was chosen.
    Permanent,
}

/// Compute `expires_at` for a submission, relative to the current time.
pub fn calculate_expiration_date(
    option: ExpirationOption,
    custom: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    calculate_expiration_date_at(option, custom, Utc::now())
}

/// Compute `expires_at` relative to `now`.
///
/// `Custom` returns the supplied date verbatim; validating it is the caller's
/// job.
pub fn calculate_expiration_date_at(
    option: ExpirationOption,
    custom: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match option {
        ExpirationOption::Never => None,
        ExpirationOption::Custom => custom,
        preset => preset
            .offset_secs()
            .and_then(Duration::try_seconds)
            .and_then(|offset| now.checked_add_signed(offset)),
    }
}

/// `now + amount * unit`.
pub fn calculate_custom_expiration(amount: u32, unit: DurationUnit) -> Result<DateTime<Utc>> {
    calculate_custom_expiration_at(amount, unit, Utc::now())
}

pub fn calculate_custom_expiration_at(
    amount: u32,
    unit: DurationUnit,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    if amount == 0 {
        return Err(PasteError::Validation(
            "custom expiration amount must be at least 1".into(),
        ));
    }
    i64::from(amount)
        .checked_mul(unit.secs())
        .and_then(Duration::try_seconds)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| PasteError::Validation("custom expiration is out of range".into()))
}

/// True once `expires_at` lies strictly in the past. `None` never expires.
pub fn is_expired(expires_at: Option<DateTime<Utc>>) -> bool {
    is_expired_at(expires_at, Utc::now())
}

pub fn is_expired_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(at) => at < now,
        None => false,
    }
}

pub fn expiration_state_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ExpirationState {
    match expires_at {
        None => ExpirationState::Permanent,
        Some(at) if at < now => ExpirationState::Expired,
        Some(_) => ExpirationState::Active,
    }
}

/// Describe the time remaining, e.g. `"Expires in 3 days"`.
pub fn format_expiration_time(expires_at: Option<DateTime<Utc>>) -> String {
    format_expiration_time_at(expires_at, Utc::now())
}

/// Buckets the remaining time into the largest whole unit, from years down
/// to seconds.
pub fn format_expiration_time_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = expires_at else {
        return "Never expires".to_string();
    };

    let diff_ms = at.signed_duration_since(now).num_milliseconds();
    if diff_ms < 0 {
        return "Expired".to_string();
    }

    let seconds = diff_ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    let buckets = [
        (years, "year"),
        (months, "month"),
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ];
    match buckets.into_iter().find(|(n, _)| *n > 0) {
        Some((n, unit)) => format!("Expires in {n} {unit}{}", if n > 1 { "s" } else { "" }),
        None => "Expires soon".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn never_has_no_expiry() {
        assert_eq!(
            calculate_expiration_date_at(ExpirationOption::Never, None, fixed_now()),
            None
        );
    }

    #[test]
    fn preset_offsets() {
        let now = fixed_now();
        let cases = [
            (ExpirationOption::OneHour, HOUR),
            (ExpirationOption::OneDay, DAY),
            (ExpirationOption::OneWeek, WEEK),
            (ExpirationOption::OneMonth, 30 * DAY),
        ];
        for (opt, offset) in cases {
            assert_eq!(
                calculate_expiration_date_at(opt, None, now),
                Some(now + secs(offset)),
                "{opt}"
            );
        }
    }

    #[test]
    fn custom_is_passed_through_verbatim() {
        let now = fixed_now();
        let past = now - secs(10);
        assert_eq!(
            calculate_expiration_date_at(ExpirationOption::Custom, Some(past), now),
            Some(past)
        );
        assert_eq!(
            calculate_expiration_date_at(ExpirationOption::Custom, None, now),
            None
        );
    }

    #[test]
    fn custom_duration() {
        let now = fixed_now();
        assert_eq!(
            calculate_custom_expiration_at(90, DurationUnit::Minutes, now).unwrap(),
            now + secs(90 * 60)
        );
        assert_eq!(
            calculate_custom_expiration_at(2, DurationUnit::Years, now).unwrap(),
            now + secs(2 * 365 * DAY)
        );
        assert!(calculate_custom_expiration_at(0, DurationUnit::Days, now).is_err());
    }

    #[test]
    fn custom_duration_relative_to_wall_clock() {
        let before = Utc::now();
        let at = calculate_custom_expiration(1, DurationUnit::Hours).unwrap();
        assert!(at >= before + secs(HOUR));
    }

    #[test]
    fn expiry_checks() {
        let now = Utc::now();
        assert!(is_expired(Some(now - secs(1))));
        assert!(!is_expired(Some(now + secs(3600))));
        assert!(!is_expired(None));
    }

    #[test]
    fn expiry_is_strict() {
        let now = fixed_now();
        assert!(!is_expired_at(Some(now), now));
        assert!(is_expired_at(Some(now - Duration::milliseconds(1)), now));
    }

    #[test]
    fn states_are_exclusive() {
        let now = fixed_now();
        assert_eq!(expiration_state_at(None, now), ExpirationState::Permanent);
        assert_eq!(
            expiration_state_at(Some(now + secs(1)), now),
            ExpirationState::Active
        );
        assert_eq!(
            expiration_state_at(Some(now - secs(1)), now),
            ExpirationState::Expired
        );
    }

    #[test]
    fn format_buckets() {
        let now = fixed_now();
        let fmt = |offset: i64| format_expiration_time_at(Some(now + secs(offset)), now);

        assert_eq!(format_expiration_time_at(None, now), "Never expires");
        assert_eq!(fmt(-1), "Expired");
        assert_eq!(fmt(0), "Expires soon");
        assert_eq!(fmt(1), "Expires in 1 second");
        assert_eq!(fmt(59), "Expires in 59 seconds");
        assert_eq!(fmt(MINUTE), "Expires in 1 minute");
        assert_eq!(fmt(2 * HOUR + 59 * MINUTE), "Expires in 2 hours");
        assert_eq!(fmt(DAY), "Expires in 1 day");
        assert_eq!(fmt(29 * DAY), "Expires in 29 days");
        assert_eq!(fmt(30 * DAY), "Expires in 1 month");
        assert_eq!(fmt(11 * MONTH), "Expires in 11 months");
        assert_eq!(fmt(12 * MONTH), "Expires in 1 year");
        assert_eq!(fmt(3 * 12 * MONTH), "Expires in 3 years");
    }

    #[test]
    fn option_labels_round_trip() {
        for opt in ExpirationOption::ALL {
            assert_eq!(opt.as_str().parse::<ExpirationOption>().unwrap(), opt);
            let json = serde_json::to_string(&opt).unwrap();
            assert_eq!(json, format!("\"{}\"", opt.as_str()));
        }
        assert!("2h".parse::<ExpirationOption>().is_err());
        assert_eq!(ExpirationOption::Custom.label(), "Custom...");
    }
}
