//! Ranks locations by the price of their cheapest feasible combination.

use tracing::{debug, warn};

use crate::domain::{Combination, LocationGroups, RankedLocation, VehicleRequirement};
use crate::search::{CombinationSearch, SearchConfig, SearchOutcome, SearchStatistics};

/// A location whose search hit a limit before finishing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteLocation {
    pub location_id: String,
    pub reason: String,
    /// Cheapest combination seen before the limit, not proven minimal.
    pub best_known: Option<Combination>,
}

/// Ranking over all locations of a dataset.
#[derive(Clone, Debug, Default)]
pub struct Ranking {
    /// Feasible locations, ascending by price. At most one entry per location.
    pub entries: Vec<RankedLocation>,
    /// Locations left out because their search was aborted.
    pub incomplete: Vec<IncompleteLocation>,
    /// Counters summed over every location searched.
    pub statistics: SearchStatistics,
    pub locations_searched: usize,
}

impl Ranking {
    pub fn into_entries(self) -> Vec<RankedLocation> {
        self.entries
    }
}

/// Searches every location and ranks the feasible ones by total price.
///
/// Infeasible locations are left out. Equal prices keep location order.
///
/// # Examples
///
/// ```
/// use parking_search::domain::{Listing, LocationGroups, VehicleRequirement};
/// use parking_search::ranker::rank_locations;
/// use parking_search::search::SearchConfig;
///
/// let groups = LocationGroups::from_listings(vec![
///     Listing::new("a1", 20, 10, 300, "a"),
///     Listing::new("b1", 20, 10, 200, "b"),
///     Listing::new("c1", 10, 10, 100, "c"),
/// ]);
/// let manifest = vec![VehicleRequirement::new(20, 1)];
///
/// let ranking = rank_locations(&groups, &manifest, &SearchConfig::default());
/// let order: Vec<&str> = ranking.entries.iter().map(|e| e.location_id.as_str()).collect();
/// assert_eq!(order, vec!["b", "a"]);
/// ```
pub fn rank_locations(
    groups: &LocationGroups,
    requirements: &[VehicleRequirement],
    config: &SearchConfig,
) -> Ranking {
    let mut ranking = Ranking::default();

    for group in groups {
        let report = CombinationSearch::new(&group.listings, config).run(requirements);
        ranking.statistics.merge(&report.statistics);
        ranking.locations_searched += 1;

        debug!(
            location_id = %group.location_id,
            listings = group.listings.len(),
            nodes = report.statistics.nodes_explored,
            outcome = %report.outcome,
            "Location searched"
        );

        match report.outcome {
            SearchOutcome::Feasible(combination) => {
                ranking
                    .entries
                    .push(RankedLocation::new(group.location_id.clone(), combination));
            }
            SearchOutcome::Infeasible => {}
            SearchOutcome::Aborted { reason, best_known } => {
                warn!(
                    location_id = %group.location_id,
                    reason = %reason,
                    "Location search aborted, excluded from ranking"
                );
                ranking.incomplete.push(IncompleteLocation {
                    location_id: group.location_id.clone(),
                    reason,
                    best_known,
                });
            }
        }
    }

    // Stable: equal prices stay in location order.
    ranking.entries.sort_by_key(|e| e.total_price_in_cents);
    ranking
}
