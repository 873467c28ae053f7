//! Legend construction.

use serde::Serialize;

use crate::encoding::MagnitudeScale;
use crate::models::FeedMetadata;

/// Civil time format used for the generation timestamp (RFC 7231).
const GENERATED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// One color swatch in the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub label: String,
    pub color: String,
}

/// Static overlay panel explaining the scale and summarizing the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendPanel {
    /// Feed generation time, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`
    pub generated: String,
    pub event_count: usize,
    /// One per bucket, ascending magnitude order
    pub swatches: Vec<Swatch>,
}

/// Build the legend for a feed.
#[must_use]
pub fn build_legend(metadata: &FeedMetadata, scale: &MagnitudeScale) -> LegendPanel {
    let generated = metadata
        .generated()
        .map(|t| t.format(GENERATED_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".into());

    LegendPanel {
        generated,
        event_count: metadata.event_count,
        swatches: scale
            .buckets()
            .iter()
            .map(|b| Swatch {
                label: b.label.clone(),
                color: b.color.clone(),
            })
            .collect(),
    }
}
