//! Map configuration.
//!
//! Everything that shapes the rendered map lives in one immutable
//! [`MapConfig`] value that is passed into the composer. The defaults
//! reproduce the classic light-map earthquake view.

use serde::Serialize;

use crate::encoding::{DEFAULT_MIN_RADIUS, DEFAULT_RADIUS_SCALE, MagnitudeEncoder, MagnitudeScale};

/// Default map center (lat, lon).
pub const DEFAULT_CENTER: (f64, f64) = (20.0, 0.0);

/// Default zoom level.
pub const DEFAULT_ZOOM: u8 = 3;

/// Id of the element the map attaches to.
pub const DEFAULT_CONTAINER_ID: &str = "map";

/// Mapbox raster tiles for the light style.
pub const MAPBOX_TILE_URL: &str =
    "https://api.mapbox.com/styles/v1/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}";

const MAPBOX_LIGHT_ID: &str = "mapbox/light-v11";

const MAPBOX_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, \
     <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, \
     Imagery &copy; <a href=\"https://www.mapbox.com/\">Mapbox</a>";

/// Placeholder in a tile URL template that is filled with the token.
const TOKEN_PLACEHOLDER: &str = "{accessToken}";

/// Raster tile layer used as the base map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerConfig {
    /// Name shown in the layer control
    pub name: String,
    /// Leaflet URL template
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    /// Tile edge in pixels
    pub tile_size: u16,
    pub zoom_offset: i8,
    /// Style id substituted for `{id}`
    pub id: String,
    pub access_token: Option<String>,
}

impl TileLayerConfig {
    /// Whether the URL template needs an access token.
    #[must_use]
    pub fn requires_token(&self) -> bool {
        self.url_template.contains(TOKEN_PLACEHOLDER)
    }

    /// Whether this layer can be drawn with the configured credentials.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        !self.requires_token() || self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// A plain 256px XYZ layer from a URL template.
    #[must_use]
    pub fn xyz(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            attribution: String::new(),
            max_zoom: 19,
            tile_size: 256,
            zoom_offset: 0,
            id: String::new(),
            access_token: None,
        }
    }
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            name: "Light Map".to_string(),
            url_template: MAPBOX_TILE_URL.to_string(),
            attribution: MAPBOX_ATTRIBUTION.to_string(),
            max_zoom: 18,
            tile_size: 512,
            zoom_offset: -1,
            id: MAPBOX_LIGHT_ID.to_string(),
            access_token: None,
        }
    }
}

/// Stroke and fill settings shared by all markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: "grey".to_string(),
            weight: 1.0,
            fill_opacity: 0.65,
        }
    }
}

/// Complete map configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub container_id: String,
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    pub scale: MagnitudeScale,
    pub radius_scale: f64,
    pub min_radius: f64,
    pub tile_layer: TileLayerConfig,
    pub marker_style: MarkerStyle,
    /// Name of the marker overlay in the layer control
    pub overlay_name: String,
}

impl MapConfig {
    /// Build the encoder described by this configuration.
    #[must_use]
    pub fn encoder(&self) -> MagnitudeEncoder {
        MagnitudeEncoder::new(self.scale.clone(), self.radius_scale, self.min_radius)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            scale: MagnitudeScale::default(),
            radius_scale: DEFAULT_RADIUS_SCALE,
            min_radius: DEFAULT_MIN_RADIUS,
            tile_layer: TileLayerConfig::default(),
            marker_style: MarkerStyle::default(),
            overlay_name: "Earthquakes".to_string(),
        }
    }
}
