//! Species label catalog.
//!
//! The catalog is the ordered index-to-label contract between the model's
//! output channels and the detection decoder. Loading fails soft: label
//! quality only affects display names, never whether a detection exists.

use crate::constants::LABEL_COLUMNS;
use std::path::Path;
use tracing::{info, warn};

/// Ordered species-name lookup indexed by model output channel.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

impl LabelCatalog {
    /// Load a catalog from a tabular label file.
    ///
    /// Any read or parse failure, including a missing label column, degrades
    /// to a synthetic catalog of stringified indices sized to `class_count`.
    pub fn load(path: Option<&Path>, class_count: usize) -> Self {
        let Some(path) = path else {
            info!("No label file provided, using {class_count} index labels");
            return Self::indexed(class_count);
        };

        match read_label_table(path) {
            Ok(labels) => {
                info!("Loaded {} labels from {}", labels.len(), path.display());
                Self { labels }
            }
            Err(reason) => {
                warn!(
                    "Could not load labels from {} ({reason}), using {class_count} index labels",
                    path.display()
                );
                Self::indexed(class_count)
            }
        }
    }

    /// Build a synthetic catalog of stringified integer indices.
    pub fn indexed(class_count: usize) -> Self {
        Self {
            labels: (0..class_count).map(|i| i.to_string()).collect(),
        }
    }

    /// Build a catalog directly from an ordered label list.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Label at `index`, or the stringified index when out of range.
    pub fn label_for(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    /// Number of labels in the catalog.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the catalog holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Read the label column from a CSV file, one label per row.
fn read_label_table(path: &Path) -> std::result::Result<Vec<String>, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| e.to_string())?;

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = headers
        .iter()
        .position(|h| LABEL_COLUMNS.contains(&h.trim().to_ascii_lowercase().as_str()))
        .ok_or_else(|| format!("no recognized label column (expected one of {LABEL_COLUMNS:?})"))?;

    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        // Short rows still occupy their index position.
        labels.push(record.get(column).unwrap_or_default().trim().to_string());
    }

    if labels.is_empty() {
        return Err("label table has no rows".to_string());
    }

    Ok(labels)
}
