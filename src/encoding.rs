//! Magnitude to visual encoding.
//!
//! A [`MagnitudeScale`] is one ordered list of explicit bucket records.
//! Buckets use an exclusive lower bound and an inclusive upper bound; the
//! first bucket is unbounded below and the last one unbounded above, so
//! every magnitude lands in exactly one bucket.

use serde::Serialize;

use crate::errors::QuakemapError;

/// Default multiplier from magnitude to marker radius (meters).
pub const DEFAULT_RADIUS_SCALE: f64 = 20_000.0;

/// Smallest radius a marker is drawn with.
pub const DEFAULT_MIN_RADIUS: f64 = 10.0;

/// Bucket returned if a scale is ever empty.
static FALLBACK_BUCKET: MagnitudeBucket = MagnitudeBucket {
    lower_exclusive: None,
    upper_inclusive: None,
    label: String::new(),
    color: String::new(),
};

/// One magnitude band and how it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeBucket {
    /// `None` means unbounded below
    pub lower_exclusive: Option<f64>,
    /// `None` means unbounded above
    pub upper_inclusive: Option<f64>,
    pub label: String,
    pub color: String,
}

impl MagnitudeBucket {
    #[must_use]
    pub fn new(
        lower_exclusive: Option<f64>,
        upper_inclusive: Option<f64>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            lower_exclusive,
            upper_inclusive,
            label: label.into(),
            color: color.into(),
        }
    }

    /// Check if a magnitude falls in this band.
    #[must_use]
    pub fn contains(&self, magnitude: f64) -> bool {
        self.lower_exclusive.is_none_or(|lo| magnitude > lo)
            && self.upper_inclusive.is_none_or(|hi| magnitude <= hi)
    }
}

/// Ordered, exhaustive set of magnitude buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MagnitudeScale {
    buckets: Vec<MagnitudeBucket>,
}

impl MagnitudeScale {
    /// Build a scale, checking that the buckets tile the real line.
    ///
    /// # Errors
    ///
    /// Returns [`QuakemapError::InvalidScale`] if the list is empty, the
    /// first bucket has a lower bound, the last has an upper bound, or
    /// neighbouring bounds do not meet exactly in ascending order.
    pub fn new(buckets: Vec<MagnitudeBucket>) -> Result<Self, QuakemapError> {
        let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
            return Err(QuakemapError::InvalidScale("no buckets".into()));
        };
        if first.lower_exclusive.is_some() {
            return Err(QuakemapError::InvalidScale(format!(
                "first bucket '{}' must be unbounded below",
                first.label
            )));
        }
        if last.upper_inclusive.is_some() {
            return Err(QuakemapError::InvalidScale(format!(
                "last bucket '{}' must be unbounded above",
                last.label
            )));
        }

        for pair in buckets.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(hi) = prev.upper_inclusive else {
                return Err(QuakemapError::InvalidScale(format!(
                    "bucket '{}' is unbounded above but is not last",
                    prev.label
                )));
            };
            if next.lower_exclusive != Some(hi) {
                return Err(QuakemapError::InvalidScale(format!(
                    "bucket '{}' must start at {hi}",
                    next.label
                )));
            }
            if let Some(next_hi) = next.upper_inclusive {
                if next_hi <= hi {
                    return Err(QuakemapError::InvalidScale(format!(
                        "bucket '{}' bounds are not ascending",
                        next.label
                    )));
                }
            }
        }

        Ok(Self { buckets })
    }

    /// Buckets in ascending magnitude order.
    #[must_use]
    pub fn buckets(&self) -> &[MagnitudeBucket] {
        &self.buckets
    }

    /// Find the bucket containing a magnitude.
    #[must_use]
    pub fn bucket_for(&self, magnitude: f64) -> &MagnitudeBucket {
        // Only NaN falls through; it is drawn in the top bucket.
        self.buckets
            .iter()
            .find(|b| b.contains(magnitude))
            .or_else(|| self.buckets.last())
            .unwrap_or(&FALLBACK_BUCKET)
    }
}

impl std::str::FromStr for MagnitudeScale {
    type Err = String;

    /// Parse `upper:label:color,...,label:color`; the last entry has no
    /// upper bound and each lower bound is the previous upper bound.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut buckets = Vec::new();
        let mut lower = None;

        for entry in s.split(',') {
            let parts: Vec<&str> = entry.trim().split(':').collect();
            let (upper, label, color) = match parts.as_slice() {
                [upper, label, color] => {
                    let upper: f64 = upper
                        .trim()
                        .parse()
                        .map_err(|e| format!("invalid bound '{upper}': {e}"))?;
                    (Some(upper), *label, *color)
                }
                [label, color] => (None, *label, *color),
                _ => {
                    return Err(format!(
                        "bucket '{entry}' must be upper:label:color or label:color"
                    ));
                }
            };
            buckets.push(MagnitudeBucket::new(lower, upper, label.trim(), color.trim()));
            lower = upper;
        }

        Self::new(buckets).map_err(|e| e.to_string())
    }
}

impl Default for MagnitudeScale {
    fn default() -> Self {
        let bounds = [
            (None, Some(1.0), "0-1", "green"),
            (Some(1.0), Some(2.0), "1-2", "#80ff00"),
            (Some(2.0), Some(3.0), "2-3", "yellow"),
            (Some(3.0), Some(4.0), "3-4", "#ffd500"),
            (Some(4.0), Some(5.0), "4-5", "#ffaa00"),
            (Some(5.0), None, "5+", "red"),
        ];
        Self {
            buckets: bounds
                .into_iter()
                .map(|(lo, hi, label, color)| MagnitudeBucket::new(lo, hi, label, color))
                .collect(),
        }
    }
}

/// Maps magnitudes to marker color and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeEncoder {
    scale: MagnitudeScale,
    radius_scale: f64,
    min_radius: f64,
}

impl MagnitudeEncoder {
    #[must_use]
    pub fn new(scale: MagnitudeScale, radius_scale: f64, min_radius: f64) -> Self {
        Self {
            scale,
            radius_scale,
            min_radius,
        }
    }

    #[must_use]
    pub fn scale(&self) -> &MagnitudeScale {
        &self.scale
    }

    /// Fill color for a magnitude.
    #[must_use]
    pub fn color(&self, magnitude: f64) -> &str {
        &self.scale.bucket_for(magnitude).color
    }

    /// Marker radius for a magnitude: `max(min_radius, magnitude * radius_scale)`.
    #[must_use]
    pub fn size(&self, magnitude: f64) -> f64 {
        self.min_radius.max(magnitude * self.radius_scale)
    }
}

impl Default for MagnitudeEncoder {
    fn default() -> Self {
        Self::new(
            MagnitudeScale::default(),
            DEFAULT_RADIUS_SCALE,
            DEFAULT_MIN_RADIUS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_is_valid() {
        let scale = MagnitudeScale::default();
        let rebuilt = MagnitudeScale::new(scale.buckets().to_vec()).unwrap();
        assert_eq!(rebuilt, scale);
        assert_eq!(scale.buckets().len(), 6);
    }

    #[test]
    fn test_color_low_and_high_ends() {
        let enc = MagnitudeEncoder::default();
        for m in [-1.5, 0.0, 0.3, 1.0] {
            assert_eq!(enc.color(m), "green", "magnitude {m}");
        }
        for m in [5.000_001, 6.1, 9.5] {
            assert_eq!(enc.color(m), "red", "magnitude {m}");
        }
    }

    #[test]
    fn test_color_boundaries_are_inclusive_upper() {
        let enc = MagnitudeEncoder::default();
        assert_eq!(enc.color(1.01), "#80ff00");
        assert_eq!(enc.color(2.0), "#80ff00");
        assert_eq!(enc.color(2.5), "yellow");
        assert_eq!(enc.color(3.0), "yellow");
        assert_eq!(enc.color(4.0), "#ffd500");
        assert_eq!(enc.color(4.2), "#ffaa00");
        assert_eq!(enc.color(5.0), "#ffaa00");
    }

    #[test]
    fn test_every_magnitude_has_one_bucket() {
        let scale = MagnitudeScale::default();
        let mut m = -2.0;
        while m <= 10.0 {
            let hits = scale.buckets().iter().filter(|b| b.contains(m)).count();
            assert_eq!(hits, 1, "magnitude {m}");
            m += 0.05;
        }
    }

    #[test]
    fn test_nan_lands_in_top_bucket() {
        let scale = MagnitudeScale::default();
        assert_eq!(scale.bucket_for(f64::NAN).label, "5+");
        assert_eq!(MagnitudeEncoder::default().color(f64::NAN), "red");
    }

    #[test]
    fn test_size_formula() {
        let enc = MagnitudeEncoder::default();
        assert!((enc.size(0.0) - 10.0).abs() < f64::EPSILON);
        assert!((enc.size(-2.0) - 10.0).abs() < f64::EPSILON);
        assert!((enc.size(0.0005) - 10.0).abs() < 1e-9);
        assert!((enc.size(0.001) - 20.0).abs() < 1e-9);
        assert!((enc.size(4.2) - 84_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_radius_scale() {
        let enc = MagnitudeEncoder::new(MagnitudeScale::default(), 2.0, 1.0);
        assert!((enc.size(4.0) - 8.0).abs() < f64::EPSILON);
        assert!((enc.size(0.2) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alternate_scale() {
        let scale = MagnitudeScale::new(vec![
            MagnitudeBucket::new(None, Some(3.0), "small", "#00f"),
            MagnitudeBucket::new(Some(3.0), None, "large", "#f00"),
        ])
        .unwrap();
        let enc = MagnitudeEncoder::new(scale, DEFAULT_RADIUS_SCALE, DEFAULT_MIN_RADIUS);
        assert_eq!(enc.color(3.0), "#00f");
        assert_eq!(enc.color(3.1), "#f00");
    }

    #[test]
    fn test_parse_scale() {
        let parsed: MagnitudeScale = "1:0-1:green,2:1-2:#80ff00,3:2-3:yellow,4:3-4:#ffd500,5:4-5:#ffaa00,5+:red"
            .parse()
            .unwrap();
        assert_eq!(parsed, MagnitudeScale::default());

        let two: MagnitudeScale = "2.5:minor:#0f0, major:#f00".parse().unwrap();
        assert_eq!(two.buckets().len(), 2);
        assert_eq!(two.bucket_for(2.6).label, "major");
    }

    #[test]
    fn test_parse_scale_errors() {
        assert!("x:small:green,big:red".parse::<MagnitudeScale>().is_err());
        assert!("3:small:green,2:mid:yellow,big:red".parse::<MagnitudeScale>().is_err());
        assert!("1:small:green".parse::<MagnitudeScale>().is_err());
        assert!("green".parse::<MagnitudeScale>().is_err());
    }

    #[test]
    fn test_rejects_broken_scales() {
        assert!(MagnitudeScale::new(Vec::new()).is_err());

        let bounded_below = vec![MagnitudeBucket::new(Some(0.0), None, "a", "red")];
        assert!(MagnitudeScale::new(bounded_below).is_err());

        let bounded_above = vec![MagnitudeBucket::new(None, Some(5.0), "a", "red")];
        assert!(MagnitudeScale::new(bounded_above).is_err());

        let gap = vec![
            MagnitudeBucket::new(None, Some(1.0), "a", "green"),
            MagnitudeBucket::new(Some(2.0), None, "b", "red"),
        ];
        assert!(MagnitudeScale::new(gap).is_err());

        let descending = vec![
            MagnitudeBucket::new(None, Some(3.0), "a", "green"),
            MagnitudeBucket::new(Some(3.0), Some(2.0), "b", "yellow"),
            MagnitudeBucket::new(Some(2.0), None, "c", "red"),
        ];
        assert!(MagnitudeScale::new(descending).is_err());
    }
}
