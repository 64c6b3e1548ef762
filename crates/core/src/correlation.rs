//! Correlation identifiers taken from request metadata.
//!
//! The value arrives as untrusted text (typically an `X-Request-ID` header)
//! and is only used for tracing. Downstream consumers expect it to fit in an
//! `i32`, so anything else is normalized here and never surfaces as a request
//! failure.

use core::num::IntErrorKind;

use serde::Serialize;
use thiserror::Error;

/// Longest prefix of the raw text kept for logging.
pub const MAX_RAW_LEN: usize = 64;

/// Why a correlation identifier could not be taken verbatim.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum CorrelationIdError {
    #[error("correlation id is empty")]
    Empty,

    #[error("correlation id is not a decimal integer")]
    NotNumeric,

    #[error("correlation id exceeds the 32-bit signed range ({0:?})")]
    OutOfRange(Overflow),
}

/// Direction of an out-of-range value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Overflow {
    AboveMax,
    BelowMin,
}

/// How a [`CorrelationId`] was obtained from its raw text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationOutcome {
    /// No identifier was supplied.
    Absent,
    /// Parsed as-is.
    Parsed,
    /// Numeric but outside the `i32` range; saturated.
    Clamped,
    /// Not usable at all; replaced with the default.
    Defaulted,
}

/// A normalized correlation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId {
    value: i32,
    outcome: CorrelationOutcome,
    raw: String,
}

impl CorrelationId {
    /// Value used when the supplied text is unusable.
    pub const DEFAULT_VALUE: i32 = 0;

    /// Parse without normalization.
    ///
    /// Accepts an optional sign and surrounding whitespace.
    pub fn parse_strict(raw: &str) -> Result<i32, CorrelationIdError> {
        raw.trim().parse::<i32>().map_err(|e| match e.kind() {
            IntErrorKind::Empty => CorrelationIdError::Empty,
            IntErrorKind::PosOverflow => CorrelationIdError::OutOfRange(Overflow::AboveMax),
            IntErrorKind::NegOverflow => CorrelationIdError::OutOfRange(Overflow::BelowMin),
            _ => CorrelationIdError::NotNumeric,
        })
    }

    /// Normalize arbitrary text into a usable identifier. Never fails.
    ///
    /// - in range: kept
    /// - numeric but out of range: saturated to `i32::MIN`/`i32::MAX`
    /// - empty or non-numeric: [`Self::DEFAULT_VALUE`]
    pub fn normalize(raw: &str) -> Self {
        let (value, outcome) = match Self::parse_strict(raw) {
            Ok(v) => (v, CorrelationOutcome::Parsed),
            Err(err) => {
                tracing::debug!(error = %err, "normalizing correlation id");
                match err {
                    CorrelationIdError::OutOfRange(Overflow::AboveMax) => {
                        (i32::MAX, CorrelationOutcome::Clamped)
                    }
                    CorrelationIdError::OutOfRange(Overflow::BelowMin) => {
                        (i32::MIN, CorrelationOutcome::Clamped)
                    }
                    CorrelationIdError::Empty | CorrelationIdError::NotNumeric => {
                        (Self::DEFAULT_VALUE, CorrelationOutcome::Defaulted)
                    }
                }
            }
        };

        Self {
            value,
            outcome,
            raw: truncate(raw),
        }
    }

    /// Normalize a raw header value (bytes may not be UTF-8).
    pub fn from_header(raw: Option<&[u8]>) -> Self {
        match raw {
            None => Self::absent(),
            Some(bytes) => match core::str::from_utf8(bytes) {
                Ok(text) => Self::normalize(text),
                Err(_) => {
                    tracing::debug!("correlation id is not valid utf-8");
                    Self {
                        value: Self::DEFAULT_VALUE,
                        outcome: CorrelationOutcome::Defaulted,
                        raw: truncate(&String::from_utf8_lossy(bytes)),
                    }
                }
            },
        }
    }

    /// Identifier for a request that carried none.
    pub fn absent() -> Self {
        Self {
            value: Self::DEFAULT_VALUE,
            outcome: CorrelationOutcome::Absent,
            raw: String::new(),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn outcome(&self) -> CorrelationOutcome {
        self.outcome
    }

    /// The supplied text, truncated to [`MAX_RAW_LEN`] characters.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the supplied text was used verbatim.
    pub fn is_exact(&self) -> bool {
        self.outcome == CorrelationOutcome::Parsed
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::absent()
    }
}

impl core::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.value, f)
    }
}

fn truncate(raw: &str) -> String {
    raw.chars().take(MAX_RAW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn in_range_values_are_kept() {
        let id = CorrelationId::normalize("12345");
        assert_eq!(id.value(), 12345);
        assert_eq!(id.outcome(), CorrelationOutcome::Parsed);

        let id = CorrelationId::normalize(" -42 ");
        assert_eq!(id.value(), -42);
        assert!(id.is_exact());

        assert_eq!(CorrelationId::parse_strict("+7"), Ok(7));
        assert_eq!(CorrelationId::parse_strict("2147483647"), Ok(i32::MAX));
        assert_eq!(CorrelationId::parse_strict("-2147483648"), Ok(i32::MIN));
    }

    #[test]
    fn three_billion_is_clamped_not_fatal() {
        assert_eq!(
            CorrelationId::parse_strict("3000000000"),
            Err(CorrelationIdError::OutOfRange(Overflow::AboveMax))
        );

        let id = CorrelationId::normalize("3000000000");
        assert_eq!(id.value(), i32::MAX);
        assert_eq!(id.outcome(), CorrelationOutcome::Clamped);
        assert_eq!(id.raw(), "3000000000");
    }

    #[test]
    fn large_negative_values_clamp_to_min() {
        let id = CorrelationId::normalize("-99999999999999999999999999999999999999999999");
        assert_eq!(id.value(), i32::MIN);
        assert_eq!(id.outcome(), CorrelationOutcome::Clamped);
    }

    #[test]
    fn garbage_is_defaulted() {
        for raw in ["", "   ", "abc", "12abc", "1.5", "0x10", "-", "+", "١٢٣"] {
            let id = CorrelationId::normalize(raw);
            assert_eq!(id.value(), CorrelationId::DEFAULT_VALUE, "{raw:?}");
            assert_eq!(id.outcome(), CorrelationOutcome::Defaulted, "{raw:?}");
        }
        assert_eq!(CorrelationId::parse_strict(""), Err(CorrelationIdError::Empty));
        assert_eq!(CorrelationId::parse_strict("abc"), Err(CorrelationIdError::NotNumeric));
    }

    #[test]
    fn header_bytes_are_handled() {
        assert_eq!(CorrelationId::from_header(None).outcome(), CorrelationOutcome::Absent);
        assert_eq!(CorrelationId::from_header(Some(b"17")).value(), 17);

        let id = CorrelationId::from_header(Some(&[0xff, 0xfe, 0x31]));
        assert_eq!(id.outcome(), CorrelationOutcome::Defaulted);
        assert_eq!(id.value(), CorrelationId::DEFAULT_VALUE);
    }

    #[test]
    fn raw_text_is_truncated_for_logging() {
        let long = "9".repeat(500);
        let id = CorrelationId::normalize(&long);
        assert_eq!(id.raw().chars().count(), MAX_RAW_LEN);
        assert_eq!(id.value(), i32::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: normalization is total over arbitrary text.
        #[test]
        fn normalize_never_panics(raw in ".*") {
            let id = CorrelationId::normalize(&raw);
            prop_assert!(id.raw().chars().count() <= MAX_RAW_LEN);
        }

        /// Property: any 64-bit integer lands on its saturated i32 value.
        #[test]
        fn wide_integers_saturate(v in any::<i64>()) {
            let id = CorrelationId::normalize(&v.to_string());
            let expected = v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
            prop_assert_eq!(id.value(), expected);

            let in_range = i32::try_from(v).is_ok();
            prop_assert_eq!(id.is_exact(), in_range);
        }
    }
}
