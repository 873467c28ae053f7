//! Marker construction.
//!
//! Turns earthquake records into library-independent circle markers.

use serde::Serialize;

use crate::encoding::MagnitudeEncoder;
use crate::models::EarthquakeFeature;

/// A circle marker for one earthquake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// (latitude, longitude)
    pub position: (f64, f64),
    pub fill_color: String,
    /// Radius in meters
    pub radius: f64,
    /// Popup markup; the place is HTML-escaped
    pub popup_text: String,
    /// Reported magnitude, `None` if the feed had none
    pub magnitude: Option<f64>,
    pub place: String,
}

/// Build one marker per feature, in input order.
#[must_use]
pub fn build_markers(features: &[EarthquakeFeature], encoder: &MagnitudeEncoder) -> Vec<MapMarker> {
    features.iter().map(|f| build_marker(f, encoder)).collect()
}

fn build_marker(feature: &EarthquakeFeature, encoder: &MagnitudeEncoder) -> MapMarker {
    let encoded = feature.encoded_magnitude();
    let shown = feature
        .magnitude
        .map_or_else(|| "unknown".to_string(), |m| m.to_string());
    MapMarker {
        position: (feature.latitude, feature.longitude),
        fill_color: encoder.color(encoded).to_string(),
        radius: encoder.size(encoded),
        popup_text: format!(
            "<b>{}</b><br>Magnitude: {shown}",
            escape_html(&feature.place)
        ),
        magnitude: feature.magnitude,
        place: feature.place.clone(),
    }
}

/// Escape text for inclusion in HTML markup.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(lon: f64, lat: f64, mag: f64, place: &str) -> EarthquakeFeature {
        EarthquakeFeature {
            longitude: lon,
            latitude: lat,
            magnitude: Some(mag),
            place: place.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        let markers = build_markers(&[], &MagnitudeEncoder::default());
        assert!(markers.is_empty());
    }

    #[test]
    fn test_one_marker_per_feature_in_order() {
        let features = vec![
            quake(-122.4, 37.7, 4.2, "Bay Area"),
            quake(142.3, 38.1, 6.8, "off the coast of Honshu"),
            quake(-116.6, 33.5, 0.4, "Anza"),
        ];
        let markers = build_markers(&features, &MagnitudeEncoder::default());
        assert_eq!(markers.len(), features.len());
        for (m, f) in markers.iter().zip(&features) {
            assert_eq!(m.place, f.place);
            assert_eq!(m.position, (f.latitude, f.longitude));
        }
        assert_eq!(markers[1].fill_color, "red");
        assert_eq!(markers[2].fill_color, "green");
    }

    #[test]
    fn test_marker_encoding() {
        let markers = build_markers(
            &[quake(-122.4, 37.7, 4.2, "Bay Area")],
            &MagnitudeEncoder::default(),
        );
        let m = &markers[0];
        assert_eq!(m.position, (37.7, -122.4));
        assert_eq!(m.fill_color, "#ffaa00");
        assert!((m.radius - 84_000.0).abs() < 1e-6);
        assert_eq!(m.popup_text, "<b>Bay Area</b><br>Magnitude: 4.2");
    }

    #[test]
    fn test_popup_magnitude_formatting() {
        let enc = MagnitudeEncoder::default();
        let markers = build_markers(&[quake(0.0, 0.0, 4.0, "A"), quake(0.0, 0.0, -0.35, "B")], &enc);
        assert!(markers[0].popup_text.ends_with("Magnitude: 4"));
        assert!(markers[1].popup_text.ends_with("Magnitude: -0.35"));
    }

    #[test]
    fn test_popup_escapes_place() {
        let markers = build_markers(
            &[quake(0.0, 0.0, 1.0, "<script>alert('x')</script> & co")],
            &MagnitudeEncoder::default(),
        );
        let popup = &markers[0].popup_text;
        assert!(!popup.contains("<script>"));
        assert!(popup.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"));
    }

    #[test]
    fn test_null_magnitude_is_drawn_as_zero_but_shown_unknown() {
        let feature = EarthquakeFeature {
            longitude: -150.1,
            latitude: 61.3,
            magnitude: None,
            place: "Alaska".into(),
        };
        let markers = build_markers(&[feature], &MagnitudeEncoder::default());
        let m = &markers[0];
        assert_eq!(m.fill_color, "green");
        assert!((m.radius - 10.0).abs() < f64::EPSILON);
        assert_eq!(m.popup_text, "<b>Alaska</b><br>Magnitude: unknown");
        assert_eq!(m.magnitude, None);
    }
}
