//! Listing combination search for a single location.
//!
//! Depth-first search over ordered subsets of a location's listings. At every
//! node each remaining listing is tried as the next addition: its lanes are
//! packed greedily with a copy of the unplaced requirements and the search
//! recurses on what is left. A node whose requirements are all placed is a
//! solution; adding listings to it could only raise the price.
//!
//! The search is exhaustive. The cheapest combination is returned; among equal
//! prices the first one reached in depth-first order (listings tried in input
//! order) wins.
//!
//! Listings are borrowed and excluded by index. Only requirement lists are
//! copied per branch. Branches whose accumulated price already reaches the
//! incumbent are cut, which never changes the answer since prices are
//! non-negative.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Combination, Listing, VehicleRequirement};
use crate::packer::pack_listing;

/// Nodes between two clock reads when a time limit is set.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Time budget per location used by [`SearchConfig::bounded`].
pub const DEFAULT_TIME_LIMIT_MS: u64 = 5_000;

/// Node budget per location used by [`SearchConfig::bounded`].
pub const DEFAULT_NODE_LIMIT: u64 = 50_000_000;

/// Which requirement a listing's length is compared against before packing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefilterPolicy {
    /// Compare against the first unplaced requirement. Assumes the manifest
    /// is sorted longest first.
    #[default]
    HeadRequirement,
    /// Compare against the longest unplaced requirement. Same as
    /// `HeadRequirement` on sorted manifests, stricter otherwise.
    LongestRequirement,
}

impl PrefilterPolicy {
    /// Minimum listing length worth packing. `requirements` must not be empty.
    fn threshold(self, requirements: &[VehicleRequirement]) -> u64 {
        match self {
            PrefilterPolicy::HeadRequirement => requirements[0].length,
            PrefilterPolicy::LongestRequirement => {
                requirements.iter().map(|r| r.length).max().unwrap_or(0)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrefilterPolicy::HeadRequirement => "head",
            PrefilterPolicy::LongestRequirement => "longest",
        }
    }
}

impl std::str::FromStr for PrefilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "head" | "head_requirement" => Ok(PrefilterPolicy::HeadRequirement),
            "longest" | "longest_requirement" => Ok(PrefilterPolicy::LongestRequirement),
            other => Err(format!("unknown prefilter policy '{}'", other)),
        }
    }
}

/// Search configuration with optional work limits.
///
/// Limits apply to each location's search separately.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub prefilter: PrefilterPolicy,
    /// Stop after exploring this many nodes.
    pub node_limit: Option<u64>,
    /// Stop after this much wall time.
    pub time_limit: Option<Duration>,
}

impl SearchConfig {
    /// Creates a config with the default node and time budgets.
    ///
    /// `Default` leaves the search unbounded; services should start from this.
    pub fn bounded() -> Self {
        Self {
            node_limit: Some(DEFAULT_NODE_LIMIT),
            time_limit: Some(Duration::from_millis(DEFAULT_TIME_LIMIT_MS)),
            ..Default::default()
        }
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_prefilter(mut self, prefilter: PrefilterPolicy) -> Self {
        self.prefilter = prefilter;
        self
    }
}

/// Tells the search whether to keep going.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

/// Result of searching one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Cheapest combination placing every vehicle.
    Feasible(Combination),
    /// No combination of the location's listings places every vehicle.
    Infeasible,
    /// A limit stopped the search before it finished. `best_known` is the
    /// cheapest combination found so far, not proven minimal.
    Aborted {
        reason: String,
        best_known: Option<Combination>,
    },
}

impl SearchOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, SearchOutcome::Feasible(_))
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SearchOutcome::Infeasible)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SearchOutcome::Aborted { .. })
    }

    /// The proven cheapest combination, if any.
    pub fn combination(&self) -> Option<&Combination> {
        match self {
            SearchOutcome::Feasible(combination) => Some(combination),
            _ => None,
        }
    }

    pub fn into_combination(self) -> Option<Combination> {
        match self {
            SearchOutcome::Feasible(combination) => Some(combination),
            _ => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Feasible(c) => write!(f, "Feasible(price={})", c.total_price_in_cents),
            SearchOutcome::Infeasible => write!(f, "Infeasible"),
            SearchOutcome::Aborted { reason, .. } => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Nodes where every vehicle was placed.
    pub solutions_found: u64,
    /// Listings skipped because they are shorter than the filter length.
    pub prunings_length: u64,
    /// Listings skipped because the price already reached the incumbent.
    pub prunings_bound: u64,
    /// Deepest level reached, i.e. most listings in one branch.
    pub max_depth: u64,
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    fn on_node_explored(&mut self, depth: u64) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    fn on_pruning_length(&mut self) {
        self.prunings_length = self.prunings_length.saturating_add(1);
    }

    #[inline]
    fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    /// Adds another search's counters to this one.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.prunings_length = self.prunings_length.saturating_add(other.prunings_length);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_total += other.time_total;
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Prunings (length):    {}", self.prunings_length)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

/// Outcome of a search together with its counters.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub statistics: SearchStatistics,
}

/// Finds the cheapest combination of `listings` that places every vehicle.
///
/// `listings` should all belong to one location.
///
/// # Examples
///
/// ```
/// use parking_search::domain::{Listing, VehicleRequirement};
/// use parking_search::search::{search_location, SearchConfig};
///
/// let listings = vec![
///     Listing::new("big", 30, 30, 400, "loc"),
///     Listing::new("s1", 20, 20, 150, "loc"),
///     Listing::new("s2", 10, 20, 80, "loc"),
/// ];
/// let manifest = vec![VehicleRequirement::new(20, 2), VehicleRequirement::new(10, 1)];
///
/// let report = search_location(&listings, &manifest, &SearchConfig::default());
/// let best = report.outcome.combination().unwrap();
/// assert_eq!(best.listing_ids, vec!["s1", "s2"]);
/// assert_eq!(best.total_price_in_cents, 230);
/// ```
pub fn search_location(
    listings: &[Listing],
    requirements: &[VehicleRequirement],
    config: &SearchConfig,
) -> SearchReport {
    CombinationSearch::new(listings, config).run(requirements)
}

/// Reusable search over one location's listings.
#[derive(Debug)]
pub struct CombinationSearch<'a> {
    listings: &'a [Listing],
    config: &'a SearchConfig,
}

impl<'a> CombinationSearch<'a> {
    pub fn new(listings: &'a [Listing], config: &'a SearchConfig) -> Self {
        Self { listings, config }
    }

    /// Searches from scratch: nothing chosen, zero price.
    pub fn run(&self, requirements: &[VehicleRequirement]) -> SearchReport {
        self.run_from(requirements, &[], 0)
    }

    /// Searches with `chosen_ids` already selected at `accumulated_price`.
    ///
    /// Returned combinations start with `chosen_ids`. Listings named in
    /// `chosen_ids` are still candidates; pass only the listings that remain.
    pub fn run_from(
        &self,
        requirements: &[VehicleRequirement],
        chosen_ids: &[String],
        accumulated_price: u64,
    ) -> SearchReport {
        let requirements: Vec<VehicleRequirement> = requirements
            .iter()
            .filter(|r| r.quantity > 0)
            .copied()
            .collect();

        let mut session = SearchSession::new(self.listings, self.config);
        let command = session.explore(&requirements, accumulated_price);
        session.stats.time_total = session.start_time.elapsed();

        let best_known = session.best.take().map(|(indices, price)| Combination {
            listing_ids: chosen_ids
                .iter()
                .cloned()
                .chain(indices.iter().map(|&i| self.listings[i].id.clone()))
                .collect(),
            total_price_in_cents: price,
        });

        let outcome = match (command, best_known) {
            (SearchCommand::Terminate(reason), best_known) => {
                SearchOutcome::Aborted { reason, best_known }
            }
            (SearchCommand::Continue, Some(combination)) => SearchOutcome::Feasible(combination),
            (SearchCommand::Continue, None) => SearchOutcome::Infeasible,
        };

        SearchReport {
            outcome,
            statistics: session.stats,
        }
    }
}

/// Mutable state of one search run.
struct SearchSession<'a> {
    listings: &'a [Listing],
    config: &'a SearchConfig,
    excluded: Vec<bool>,
    chosen: Vec<usize>,
    best: Option<(Vec<usize>, u64)>,
    stats: SearchStatistics,
    start_time: Instant,
}

impl<'a> SearchSession<'a> {
    fn new(listings: &'a [Listing], config: &'a SearchConfig) -> Self {
        Self {
            listings,
            config,
            excluded: vec![false; listings.len()],
            chosen: Vec::with_capacity(listings.len()),
            best: None,
            stats: SearchStatistics::default(),
            start_time: Instant::now(),
        }
    }

    fn explore(&mut self, requirements: &[VehicleRequirement], price: u64) -> SearchCommand {
        self.stats.on_node_explored(self.chosen.len() as u64);

        if let SearchCommand::Terminate(reason) = self.check_limits() {
            return SearchCommand::Terminate(reason);
        }

        if requirements.is_empty() {
            self.on_solution(price);
            return SearchCommand::Continue;
        }

        let threshold = self.config.prefilter.threshold(requirements);

        for i in 0..self.listings.len() {
            if self.excluded[i] {
                continue;
            }
            let listing = &self.listings[i];

            if listing.length < threshold {
                self.stats.on_pruning_length();
                continue;
            }

            let next_price = price.saturating_add(listing.price_in_cents);
            if matches!(self.best, Some((_, best)) if next_price >= best) {
                self.stats.on_pruning_bound();
                continue;
            }

            let remaining = pack_listing(listing, requirements);

            self.excluded[i] = true;
            self.chosen.push(i);
            let command = self.explore(&remaining, next_price);
            self.chosen.pop();
            self.excluded[i] = false;

            if let SearchCommand::Terminate(_) = command {
                return command;
            }
        }

        SearchCommand::Continue
    }

    fn on_solution(&mut self, price: u64) {
        self.stats.on_solution_found();
        let improves = match self.best {
            Some((_, best)) => price < best,
            None => true,
        };
        if improves {
            trace!(price, listings = self.chosen.len(), "New best combination");
            self.best = Some((self.chosen.clone(), price));
        }
    }

    fn check_limits(&self) -> SearchCommand {
        if let Some(limit) = self.config.node_limit {
            if self.stats.nodes_explored > limit {
                return SearchCommand::Terminate(format!("Node limit of {} exceeded", limit));
            }
        }

        if let Some(limit) = self.config.time_limit {
            if self.stats.nodes_explored % TIME_CHECK_INTERVAL == 0
                && self.start_time.elapsed() > limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {} ms exceeded",
                    limit.as_millis()
                ));
            }
        }

        SearchCommand::Continue
    }
}
