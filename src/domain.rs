//! Domain model for the parking search.
//!
//! # Overview
//!
//! - [`VehicleRequirement`]s: identical vehicles still waiting for a lane slot
//! - [`Listing`]s: rentable parking spaces split into fixed-width lanes
//! - [`LocationGroups`]: listings grouped per location, in dataset order
//! - [`Combination`]: the listings chosen for one location and their price
//!
//! Listings are immutable once loaded. Only requirement quantities change
//! while packing, and always on a working copy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Width of a single lane. A listing holds `width / LANE_WIDTH` lanes.
pub const LANE_WIDTH: u64 = 10;

/// A number of identical-length vehicles that still need a place.
///
/// # Examples
///
/// ```
/// use parking_search::domain::VehicleRequirement;
///
/// let trucks = VehicleRequirement::new(30, 2);
/// assert_eq!(trucks.total_length(), 60);
/// assert!(!trucks.is_satisfied());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRequirement {
    /// Length of each vehicle.
    pub length: u64,
    /// Units still unplaced.
    pub quantity: u64,
}

impl VehicleRequirement {
    pub fn new(length: u64, quantity: u64) -> Self {
        Self { length, quantity }
    }

    /// Combined length of all unplaced units.
    pub fn total_length(&self) -> u64 {
        self.length.saturating_mul(self.quantity)
    }

    pub fn is_satisfied(&self) -> bool {
        self.quantity == 0
    }
}

/// Sorts a manifest by decreasing vehicle length, keeping the relative
/// order of equal lengths.
///
/// The combination search only checks the head requirement against a
/// listing's length, so callers hand it manifests in this order.
///
/// ```
/// use parking_search::domain::{sort_longest_first, VehicleRequirement};
///
/// let mut manifest = vec![VehicleRequirement::new(10, 1), VehicleRequirement::new(20, 3)];
/// sort_longest_first(&mut manifest);
/// assert_eq!(manifest[0].length, 20);
/// ```
pub fn sort_longest_first(requirements: &mut [VehicleRequirement]) {
    requirements.sort_by(|a, b| b.length.cmp(&a.length));
}

/// A rentable parking space at some location.
///
/// # Examples
///
/// ```
/// use parking_search::domain::Listing;
///
/// let listing = Listing::new("garage-1", 40, 25, 1_500, "downtown");
/// assert_eq!(listing.lane_count(), 2);
/// assert_eq!(listing.capacity(), 80);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    /// Lane capacity: the summed length of vehicles one lane can hold.
    pub length: u64,
    pub width: u64,
    pub price_in_cents: u64,
    pub location_id: String,
}

impl Listing {
    pub fn new(
        id: impl Into<String>,
        length: u64,
        width: u64,
        price_in_cents: u64,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            price_in_cents,
            location_id: location_id.into(),
        }
    }

    /// Number of lanes, `floor(width / LANE_WIDTH)`.
    pub fn lane_count(&self) -> u64 {
        self.width / LANE_WIDTH
    }

    /// Total length over all lanes.
    pub fn capacity(&self) -> u64 {
        self.lane_count().saturating_mul(self.length)
    }
}

/// All listings of one location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationGroup {
    pub location_id: String,
    pub listings: Vec<Listing>,
}

/// Listings grouped by `location_id`.
///
/// Groups keep the order in which their location first appeared, so
/// equal-price locations rank in dataset order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationGroups {
    groups: Vec<LocationGroup>,
}

impl LocationGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups listings by location, first-seen order.
    ///
    /// ```
    /// use parking_search::domain::{Listing, LocationGroups};
    ///
    /// let groups = LocationGroups::from_listings(vec![
    ///     Listing::new("a", 10, 10, 100, "north"),
    ///     Listing::new("b", 10, 10, 100, "south"),
    ///     Listing::new("c", 10, 10, 100, "north"),
    /// ]);
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups.get("north").map(|g| g.listings.len()), Some(2));
    /// ```
    pub fn from_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let mut groups: Vec<LocationGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for listing in listings {
            match index.get(&listing.location_id) {
                Some(&i) => groups[i].listings.push(listing),
                None => {
                    index.insert(listing.location_id.clone(), groups.len());
                    groups.push(LocationGroup {
                        location_id: listing.location_id.clone(),
                        listings: vec![listing],
                    });
                }
            }
        }

        Self { groups }
    }

    pub fn get(&self, location_id: &str) -> Option<&LocationGroup> {
        self.groups.iter().find(|g| g.location_id == location_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of listings over all locations.
    pub fn listing_count(&self) -> usize {
        self.groups.iter().map(|g| g.listings.len()).sum()
    }
}

impl<'a> IntoIterator for &'a LocationGroups {
    type Item = &'a LocationGroup;
    type IntoIter = std::slice::Iter<'a, LocationGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Listings chosen for one location, in selection order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub listing_ids: Vec<String>,
    pub total_price_in_cents: u64,
}

/// A feasible location in the final ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedLocation {
    pub location_id: String,
    pub listing_ids: Vec<String>,
    pub total_price_in_cents: u64,
}

impl RankedLocation {
    pub fn new(location_id: impl Into<String>, combination: Combination) -> Self {
        Self {
            location_id: location_id.into(),
            listing_ids: combination.listing_ids,
            total_price_in_cents: combination.total_price_in_cents,
        }
    }
}
