//! Listings dataset loading.
//!
//! The dataset is a JSON array of listing records:
//!
//! ```json
//! [{"id": "l1", "length": 20, "width": 30, "location_id": "loc1", "price_in_cents": 1500}]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::{Listing, LocationGroups};

/// Errors that can occur while loading a listings dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read listings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid listings JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses listing records from a JSON string.
pub fn parse_listings(json: &str) -> Result<Vec<Listing>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads listing records from a JSON file.
pub fn load_listings(path: impl AsRef<Path>) -> Result<Vec<Listing>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_listings(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a listings file and groups it by location.
pub fn load_grouped_listings(path: impl AsRef<Path>) -> Result<LocationGroups, LoadError> {
    let path = path.as_ref();
    let groups = LocationGroups::from_listings(load_listings(path)?);
    info!(
        path = %path.display(),
        locations = groups.len(),
        listings = groups.listing_count(),
        "Listings loaded"
    );
    Ok(groups)
}
