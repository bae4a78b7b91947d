//! Demo data generators for the parking search.
//!
//! Produces seeded, reproducible listing datasets:
//! - Small (5 locations, 2-4 listings each)
//! - Medium (20 locations, 3-6 listings each)
//! - Large (50 locations, 5-8 listings each)
//!
//! Listing kinds are weighted like a city inventory:
//! - Driveway (50%): short and narrow, cheap
//! - Lot (35%): mid-length, a few lanes
//! - Depot (15%): long and wide, expensive

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Listing, VehicleRequirement};

/// Demo dataset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Medium,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "MEDIUM" => Ok(DemoData::Medium),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

/// Returns the names of all demo datasets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "MEDIUM", "LARGE"]
}

/// Demo dataset configuration.
struct DemoConfig {
    seed: u64,
    location_count: usize,
    min_listings: usize,
    max_listings: usize,
}

impl DemoData {
    fn config(self) -> DemoConfig {
        match self {
            DemoData::Small => DemoConfig {
                seed: 0,
                location_count: 5,
                min_listings: 2,
                max_listings: 4,
            },
            DemoData::Medium => DemoConfig {
                seed: 1,
                location_count: 20,
                min_listings: 3,
                max_listings: 6,
            },
            DemoData::Large => DemoConfig {
                seed: 2,
                location_count: 50,
                min_listings: 5,
                max_listings: 8,
            },
        }
    }
}

/// Kind of parking space with its size and price ranges.
#[derive(Clone, Copy)]
enum ListingKind {
    Driveway,
    Lot,
    Depot,
}

impl ListingKind {
    /// Weighted random selection: 50% driveway, 35% lot, 15% depot.
    fn random(rng: &mut StdRng) -> Self {
        let r: u32 = rng.gen_range(1..=100);
        if r <= 50 {
            ListingKind::Driveway
        } else if r <= 85 {
            ListingKind::Lot
        } else {
            ListingKind::Depot
        }
    }

    /// Length range, in multiples of 5.
    fn length_range(self) -> (u64, u64) {
        match self {
            ListingKind::Driveway => (2, 5),
            ListingKind::Lot => (4, 10),
            ListingKind::Depot => (8, 20),
        }
    }

    /// Lane range.
    fn lane_range(self) -> (u64, u64) {
        match self {
            ListingKind::Driveway => (1, 1),
            ListingKind::Lot => (1, 3),
            ListingKind::Depot => (2, 5),
        }
    }

    /// Price per unit of capacity, in cents.
    fn unit_price_range(self) -> (u64, u64) {
        match self {
            ListingKind::Driveway => (8, 15),
            ListingKind::Lot => (5, 12),
            ListingKind::Depot => (6, 10),
        }
    }
}

/// Generates a demo listings dataset.
///
/// ```
/// use parking_search::demo_data::{generate, DemoData};
///
/// let listings = generate(DemoData::Small);
/// assert!(listings.len() >= 10);
/// assert_eq!(listings, generate(DemoData::Small));
/// ```
pub fn generate(demo: DemoData) -> Vec<Listing> {
    let config = demo.config();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut listings = Vec::new();

    for loc in 0..config.location_count {
        let location_id = format!("loc-{:03}", loc);
        let count = rng.gen_range(config.min_listings..=config.max_listings);

        for n in 0..count {
            let kind = ListingKind::random(&mut rng);
            let (min_len, max_len) = kind.length_range();
            let (min_lanes, max_lanes) = kind.lane_range();
            let (min_unit, max_unit) = kind.unit_price_range();

            let length = rng.gen_range(min_len..=max_len) * 5;
            let lanes = rng.gen_range(min_lanes..=max_lanes);
            // Up to 9 extra width units that do not make a full lane.
            let width = lanes * 10 + rng.gen_range(0..10);
            let price = length * lanes * rng.gen_range(min_unit..=max_unit);

            listings.push(Listing::new(
                format!("{}-{}", location_id, n),
                length,
                width,
                price,
                location_id.clone(),
            ));
        }
    }

    listings
}

/// A mixed manifest of cars, vans and a truck, sorted longest first.
pub fn demo_manifest() -> Vec<VehicleRequirement> {
    vec![
        VehicleRequirement::new(40, 1),
        VehicleRequirement::new(20, 2),
        VehicleRequirement::new(10, 3),
    ]
}
