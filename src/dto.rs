//! DTOs for REST API requests/responses.
//!
//! Field names are snake_case on the wire (`price_in_cents`,
//! `total_price_in_cents`, `listing_ids`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{sort_longest_first, RankedLocation, VehicleRequirement};

/// One line of the vehicle manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VehicleDto {
    /// Vehicle length. Negative values are rejected during deserialization.
    pub length: u64,
    /// Number of vehicles of this length, at least 1.
    pub quantity: u64,
}

/// A manifest line that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestViolation {
    pub index: usize,
    pub message: String,
}

impl std::fmt::Display for ManifestViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vehicle {}: {}", self.index, self.message)
    }
}

/// Validates a manifest and converts it to requirements sorted longest first.
///
/// ```
/// use parking_search::dto::{manifest_to_requirements, VehicleDto};
///
/// let manifest = vec![
///     VehicleDto { length: 10, quantity: 2 },
///     VehicleDto { length: 25, quantity: 1 },
/// ];
/// let requirements = manifest_to_requirements(&manifest).unwrap();
/// assert_eq!(requirements[0].length, 25);
///
/// let bad = vec![VehicleDto { length: 10, quantity: 0 }];
/// assert!(manifest_to_requirements(&bad).is_err());
/// ```
pub fn manifest_to_requirements(
    manifest: &[VehicleDto],
) -> Result<Vec<VehicleRequirement>, ManifestViolation> {
    let mut requirements = Vec::with_capacity(manifest.len());
    for (index, vehicle) in manifest.iter().enumerate() {
        if vehicle.quantity < 1 {
            return Err(ManifestViolation {
                index,
                message: "quantity must be at least 1".to_string(),
            });
        }
        requirements.push(VehicleRequirement::new(vehicle.length, vehicle.quantity));
    }
    sort_longest_first(&mut requirements);
    Ok(requirements)
}

/// One ranked location in the search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResultDto {
    pub location_id: String,
    /// Listing ids in selection order.
    pub listing_ids: Vec<String>,
    pub total_price_in_cents: u64,
}

impl From<RankedLocation> for SearchResultDto {
    fn from(entry: RankedLocation) -> Self {
        Self {
            location_id: entry.location_id,
            listing_ids: entry.listing_ids,
            total_price_in_cents: entry.total_price_in_cents,
        }
    }
}

/// Response of the root liveness check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status indicator ("UP" when healthy).
    pub status: &'static str,
}

/// Application info response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
    /// Active pre-filter policy ("head" or "longest").
    pub prefilter: &'static str,
}

/// Dataset summary after a reload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReloadResponse {
    pub locations: usize,
    pub listings: usize,
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_sorted_longest_first() {
        let manifest = [
            VehicleDto { length: 10, quantity: 1 },
            VehicleDto { length: 30, quantity: 2 },
            VehicleDto { length: 20, quantity: 1 },
        ];
        let lengths: Vec<u64> = manifest_to_requirements(&manifest)
            .unwrap()
            .iter()
            .map(|r| r.length)
            .collect();
        assert_eq!(lengths, vec![30, 20, 10]);
    }

    #[test]
    fn test_zero_quantity_names_offending_line() {
        let manifest = [
            VehicleDto { length: 10, quantity: 1 },
            VehicleDto { length: 20, quantity: 0 },
        ];
        let violation = manifest_to_requirements(&manifest).unwrap_err();
        assert_eq!(violation.index, 1);
        assert_eq!(violation.to_string(), "vehicle 1: quantity must be at least 1");
    }

    #[test]
    fn test_negative_length_fails_to_deserialize() {
        let parsed: Result<Vec<VehicleDto>, _> =
            serde_json::from_str(r#"[{"length": -5, "quantity": 1}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_result_serializes_snake_case() {
        let dto = SearchResultDto {
            location_id: "loc".into(),
            listing_ids: vec!["a".into()],
            total_price_in_cents: 42,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"location_id": "loc", "listing_ids": ["a"], "total_price_in_cents": 42})
        );
    }
}
