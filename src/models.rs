//! Data models for USGS earthquake feeds.
//!
//! The raw structures match the GeoJSON summary feed format. They are
//! narrowed into [`EarthquakeFeature`] and [`FeedMetadata`], which are
//! all the map pipeline needs.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::QuakemapError;

/// Place text used when the feed has none.
const UNKNOWN_PLACE: &str = "Unknown location";

/// Magnitude a null-magnitude event is colored and sized as.
pub const NULL_MAGNITUDE: f64 = 0.0;

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata
    pub metadata: Metadata,

    /// Earthquake events
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure and every feature in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection type is wrong or a feature is
    /// missing its coordinates.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        self.features.iter().try_for_each(Feature::validate)
    }

    /// Narrow the feed to the records the map needs.
    ///
    /// # Errors
    ///
    /// Returns an error if any feature is malformed.
    pub fn earthquakes(&self) -> Result<Vec<EarthquakeFeature>, QuakemapError> {
        self.features.iter().map(EarthquakeFeature::try_from).collect()
    }

    #[must_use]
    pub fn feed_metadata(&self) -> FeedMetadata {
        FeedMetadata::from(&self.metadata)
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// When this feed was generated (ms since epoch)
    pub generated: i64,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Number of events in response
    pub count: usize,
}

/// A single earthquake event as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Unique event ID
    #[serde(default)]
    pub id: String,

    /// Geographic location
    pub geometry: Geometry,

    /// Event properties
    pub properties: Properties,
}

impl Feature {
    /// Validate the event structure.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two coordinates are present.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.geometry.coordinates.len() < 2 {
            return Err(QuakemapError::Validation(format!(
                "event '{}': expected at least 2 coordinates, got {}",
                self.id,
                self.geometry.coordinates.len()
            )));
        }
        Ok(())
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// Event properties used by the map.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,
}

/// One earthquake, reduced to what a marker needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeFeature {
    pub longitude: f64,
    pub latitude: f64,
    /// `None` when the feed reports a null magnitude
    pub magnitude: Option<f64>,
    pub place: String,
}

impl EarthquakeFeature {
    /// Magnitude used for color and size.
    #[must_use]
    pub fn encoded_magnitude(&self) -> f64 {
        self.magnitude.unwrap_or(NULL_MAGNITUDE)
    }
}

impl TryFrom<&Feature> for EarthquakeFeature {
    type Error = QuakemapError;

    fn try_from(f: &Feature) -> Result<Self, Self::Error> {
        f.validate()?;
        let coords = &f.geometry.coordinates;
        Ok(Self {
            longitude: coords[0],
            latitude: coords[1],
            magnitude: f.properties.mag,
            place: f
                .properties
                .place
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        })
    }
}

/// Summary of one feed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedMetadata {
    pub generated_at_epoch_millis: i64,
    pub event_count: usize,
}

impl FeedMetadata {
    /// Get the generation time as a `DateTime<Utc>`.
    #[must_use]
    pub fn generated(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.generated_at_epoch_millis)
            .single()
    }
}

impl From<&Metadata> for FeedMetadata {
    fn from(m: &Metadata) -> Self {
        Self {
            generated_at_epoch_millis: m.generated,
            event_count: m.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../tools/sample_all_day.json");

    #[test]
    fn test_parse_sample_feed() {
        let feed: FeatureCollection =
            serde_json::from_str(SAMPLE).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.type_, "FeatureCollection");
        assert_eq!(feed.features.len(), 4);
        assert_eq!(feed.metadata.count, 4);
        assert_eq!(feed.metadata.title, "USGS All Earthquakes, Past Day");
    }

    #[test]
    fn test_narrow_sample_feed() {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        let quakes = feed.earthquakes().unwrap();
        assert_eq!(quakes.len(), feed.features.len());

        let first = &quakes[0];
        assert!((first.longitude - (-122.4)).abs() < 1e-9);
        assert!((first.latitude - 37.7).abs() < 1e-9);
        assert_eq!(first.magnitude, Some(4.2));
        assert_eq!(first.place, "10 km NW of Bay Area, CA");

        // null magnitude and place
        let unknown = &quakes[3];
        assert_eq!(unknown.magnitude, None);
        assert!(unknown.encoded_magnitude().abs() < f64::EPSILON);
        assert_eq!(unknown.place, UNKNOWN_PLACE);
    }

    #[test]
    fn test_wrong_collection_type() {
        let json = r#"{"type":"Feature","metadata":{"generated":0,"count":0},"features":[]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(matches!(
            feed.validate(),
            Err(QuakemapError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_feature_without_latitude_is_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "metadata": {"generated": 0, "count": 1},
            "features": [{"id": "x1", "geometry": {"coordinates": [10.0]},
                          "properties": {"mag": 1.0, "place": "Nowhere"}}]
        }"#;
        let feed: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(matches!(feed.validate(), Err(QuakemapError::Validation(_))));
        assert!(feed.earthquakes().is_err());
    }

    #[test]
    fn test_feed_metadata() {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        let meta = feed.feed_metadata();
        assert_eq!(meta.generated_at_epoch_millis, 1_700_000_000_000);
        assert_eq!(meta.event_count, 4);
        assert_eq!(
            meta.generated().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }
}
