//! Map composition.
//!
//! Combines the base tile layer, the marker overlay, the legend and the
//! layer control into one [`MapView`]. The view is plain data; drawing it
//! is left to the page renderer.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{MapConfig, MarkerStyle, TileLayerConfig};
use crate::errors::QuakemapError;
use crate::legend::{LegendPanel, build_legend};
use crate::markers::{MapMarker, build_markers};
use crate::models::FeatureCollection;

/// Corner the legend is anchored to.
const LEGEND_POSITION: &str = "bottomright";

/// Title used when the feed does not carry one.
const DEFAULT_TITLE: &str = "Recent Earthquakes";

/// Named group of markers that can be toggled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerOverlay {
    pub name: String,
    pub style: MarkerStyle,
    pub markers: Vec<MapMarker>,
}

/// Legend plus where it is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendControl {
    pub position: String,
    pub panel: LegendPanel,
}

/// Layer-visibility control listing toggleable layers by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerControl {
    pub collapsed: bool,
    pub base_layers: Vec<String>,
    pub overlays: Vec<String>,
}

/// The whole interactive map, independent of any drawing library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub container_id: String,
    pub title: String,
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    pub base_layers: Vec<TileLayerConfig>,
    pub overlay: MarkerOverlay,
    pub legend: LegendControl,
    pub layer_control: LayerControl,
}

/// Compose a view from a parsed feed.
///
/// If the base layer needs an access token that is not configured, it is
/// left out and the markers and legend are still composed.
///
/// # Errors
///
/// Returns an error if the feed is malformed.
pub fn compose(feed: &FeatureCollection, config: &MapConfig) -> Result<MapView, QuakemapError> {
    feed.validate()?;
    let quakes = feed.earthquakes()?;
    let encoder = config.encoder();

    let markers = build_markers(&quakes, &encoder);
    let panel = build_legend(&feed.feed_metadata(), encoder.scale());
    debug!("composed {} markers", markers.len());

    let base_layers = if config.tile_layer.is_renderable() {
        vec![config.tile_layer.clone()]
    } else {
        warn!(
            "no access token for tile layer '{}', base map will not be drawn",
            config.tile_layer.name
        );
        Vec::new()
    };

    let title = if feed.metadata.title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        feed.metadata.title.clone()
    };

    Ok(MapView {
        container_id: config.container_id.clone(),
        title,
        center: config.center,
        zoom: config.zoom,
        layer_control: LayerControl {
            collapsed: false,
            base_layers: base_layers.iter().map(|l| l.name.clone()).collect(),
            overlays: vec![config.overlay_name.clone()],
        },
        base_layers,
        overlay: MarkerOverlay {
            name: config.overlay_name.clone(),
            style: config.marker_style.clone(),
            markers,
        },
        legend: LegendControl {
            position: LEGEND_POSITION.to_string(),
            panel,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../tools/sample_all_day.json");

    const BAY_AREA: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1700000000000, "count": 1},
        "features": [{
            "type": "Feature",
            "id": "nc1",
            "geometry": {"type": "Point", "coordinates": [-122.4, 37.7]},
            "properties": {"mag": 4.2, "place": "Bay Area"}
        }]
    }"#;

    fn tokened_config() -> MapConfig {
        let mut config = MapConfig::default();
        config.tile_layer.access_token = Some("pk.test".into());
        config
    }

    #[test]
    fn test_end_to_end_single_feature() {
        let feed: FeatureCollection = serde_json::from_str(BAY_AREA).unwrap();
        let view = compose(&feed, &tokened_config()).unwrap();

        assert_eq!(view.overlay.markers.len(), 1);
        let marker = &view.overlay.markers[0];
        assert_eq!(marker.fill_color, "#ffaa00");
        assert!((marker.radius - 84_000.0).abs() < 1e-6);
        assert!(marker.popup_text.contains("Bay Area"));
        assert!(marker.popup_text.contains("4.2"));

        assert_eq!(view.legend.panel.event_count, 1);
        assert_eq!(view.legend.panel.swatches.len(), 6);
        assert_eq!(view.legend.position, "bottomright");
    }

    #[test]
    fn test_view_layout() {
        let feed: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        let view = compose(&feed, &tokened_config()).unwrap();

        assert_eq!(view.container_id, "map");
        assert_eq!(view.title, "USGS All Earthquakes, Past Day");
        assert_eq!(view.center, (20.0, 0.0));
        assert_eq!(view.zoom, 3);
        assert_eq!(view.base_layers.len(), 1);
        assert!(!view.layer_control.collapsed);
        assert_eq!(view.layer_control.base_layers, ["Light Map"]);
        assert_eq!(view.layer_control.overlays, ["Earthquakes"]);
        assert_eq!(view.overlay.markers.len(), feed.features.len());
        assert!(view.overlay.markers[3].popup_text.ends_with("Magnitude: unknown"));
    }

    #[test]
    fn test_empty_feed() {
        let json = r#"{"type":"FeatureCollection","metadata":{"generated":1700000000000,"count":0},"features":[]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).unwrap();
        let view = compose(&feed, &tokened_config()).unwrap();

        assert!(view.overlay.markers.is_empty());
        assert_eq!(view.legend.panel.event_count, 0);
        assert_eq!(view.legend.panel.swatches.len(), 6);
        assert_eq!(view.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_missing_token_drops_only_base_layer() {
        let feed: FeatureCollection = serde_json::from_str(BAY_AREA).unwrap();
        let view = compose(&feed, &MapConfig::default()).unwrap();

        assert!(view.base_layers.is_empty());
        assert!(view.layer_control.base_layers.is_empty());
        assert_eq!(view.overlay.markers.len(), 1);
        assert_eq!(view.legend.panel.event_count, 1);
    }

    #[test]
    fn test_malformed_feed_is_rejected() {
        let json = r#"{"type":"FeatureCollection","metadata":{"generated":0,"count":1},
            "features":[{"geometry":{"coordinates":[]},"properties":{"mag":1.0,"place":"x"}}]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).unwrap();
        assert!(matches!(
            compose(&feed, &MapConfig::default()),
            Err(QuakemapError::Validation(_))
        ));
    }
}
