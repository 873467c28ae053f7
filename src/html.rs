//! Standalone HTML page for a [`MapView`].
//!
//! The page loads Leaflet from a CDN, embeds the view as JSON and builds
//! the layers in a short script. Everything is in one document so it can
//! be written to disk or served as-is.

use std::fmt::Write as _;

use crate::composer::MapView;
use crate::errors::QuakemapError;
use crate::legend::LegendPanel;
use crate::markers::escape_html;

/// Render the legend panel as the inner HTML of its control.
#[must_use]
pub fn legend_html(panel: &LegendPanel) -> String {
    let mut html = format!(
        "<p><b>Generated: {}</b></p>\
         <p>Number of Earthquakes: {}</p>\
         <hr>\
         <p><b>Legend (Magnitude)</b></p>",
        escape_html(&panel.generated),
        panel.event_count
    );
    for swatch in &panel.swatches {
        // Writing to a String cannot fail.
        let _ = write!(
            html,
            "<i class=\"rectangle\" style=\"background:{}\"></i>{}<br>",
            escape_html(&swatch.color),
            escape_html(&swatch.label)
        );
    }
    html
}

/// Render a complete HTML document for the view.
///
/// # Errors
///
/// Returns an error if the view cannot be serialized.
pub fn render_page(view: &MapView) -> Result<String, QuakemapError> {
    let view_json = script_safe(&serde_json::to_string(view)?);
    let legend_json = script_safe(&serde_json::to_string(&legend_html(&view.legend.panel))?);

    Ok(PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&view.title))
        .replace("{{CONTAINER}}", &escape_html(&view.container_id))
        .replace("{{VIEW_JSON}}", &view_json)
        .replace("{{LEGEND_JSON}}", &legend_json))
}

/// Keep embedded JSON from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>

    <!-- Leaflet -->
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>

    <style>
        html, body { height: 100%; margin: 0; padding: 0; }
        #{{CONTAINER}} { height: 100%; width: 100%; }

        .legend {
            padding: 6px 10px;
            font: 14px/18px Arial, Helvetica, sans-serif;
            background: rgba(255, 255, 255, 0.85);
            box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
            border-radius: 5px;
            color: #333;
        }

        .legend p { margin: 4px 0; }

        .legend .rectangle {
            width: 18px;
            height: 18px;
            float: left;
            margin-right: 8px;
            opacity: 0.8;
        }
    </style>
</head>
<body>
    <div id="{{CONTAINER}}"></div>

    <script>
    (function() {
        var view = {{VIEW_JSON}};
        var legendHtml = {{LEGEND_JSON}};

        var baseMaps = {};
        var layers = [];
        view.baseLayers.forEach(function(tile) {
            var layer = L.tileLayer(tile.urlTemplate, {
                attribution: tile.attribution,
                maxZoom: tile.maxZoom,
                id: tile.id,
                accessToken: tile.accessToken,
                tileSize: tile.tileSize,
                zoomOffset: tile.zoomOffset
            });
            baseMaps[tile.name] = layer;
            layers.push(layer);
        });

        var style = view.overlay.style;
        var markers = view.overlay.markers.map(function(m) {
            return L.circle(m.position, {
                color: style.color,
                weight: style.weight,
                fillColor: m.fillColor,
                fillOpacity: style.fillOpacity,
                radius: m.radius
            }).bindPopup(m.popupText);
        });
        var earthquakes = L.layerGroup(markers);
        layers.push(earthquakes);

        var overlayMaps = {};
        overlayMaps[view.overlay.name] = earthquakes;

        var map = L.map(view.containerId, {
            center: view.center,
            zoom: view.zoom,
            layers: layers
        });

        L.control.layers(baseMaps, overlayMaps, {
            collapsed: view.layerControl.collapsed
        }).addTo(map);

        var legend = L.control({ position: view.legend.position });
        legend.onAdd = function() {
            var div = L.DomUtil.create("div", "legend");
            div.innerHTML = legendHtml;
            return div;
        };
        legend.addTo(map);
    })();
    </script>
</body>
</html>
"##;
