//! Price-range parsing

use serde::Serialize;

/// A closed numeric price interval; `max` may be infinite
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceInterval {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceInterval {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl PriceInterval {
    /// `[0, +inf)`
    pub const fn unrestricted() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// Build an interval, swapping the bounds if given in reverse
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Parse a price-range expression. Never fails: anything malformed
    /// yields the unrestricted interval.
    ///
    /// Accepted forms, checked in order:
    /// - `all` or empty: unrestricted
    /// - `min-max`
    /// - `min+`: no upper bound
    /// - a single target price `t`: `[0.8t, 1.2t]`
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Self::unrestricted();
        }

        let parsed = if let Some((low, high)) = raw.split_once('-') {
            parse_amount(low)
                .zip(parse_amount(high))
                .map(|(min, max)| Self::new(min, max))
        } else if let Some(low) = raw.strip_suffix('+') {
            parse_amount(low).map(|min| Self::new(min, f64::INFINITY))
        } else {
            parse_amount(raw).map(|target| Self::new(target * 4.0 / 5.0, target * 6.0 / 5.0))
        };

        parsed.unwrap_or_else(|| {
            tracing::debug!(price_range = %raw, "Unparseable price range, ignoring");
            Self::unrestricted()
        })
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    pub fn is_unrestricted(&self) -> bool {
        self.min <= 0.0 && self.max == f64::INFINITY
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_prefix('$').unwrap_or(text).trim();
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
