//! Benchmark for the combination search.
//!
//! Run with: cargo run --release --bin bench [SMALL|MEDIUM|LARGE]

use parking_search::demo_data::{self, DemoData};
use parking_search::domain::LocationGroups;
use parking_search::ranker::rank_locations;
use parking_search::search::{PrefilterPolicy, SearchConfig};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let name = std::env::args().nth(1).unwrap_or_else(|| "LARGE".to_string());
    let demo: DemoData = name.parse().map_err(|_| {
        anyhow::anyhow!(
            "unknown dataset '{}', expected one of {:?}",
            name,
            demo_data::list_demo_data()
        )
    })?;

    let groups = LocationGroups::from_listings(demo_data::generate(demo));
    let manifest = demo_data::demo_manifest();
    let vehicles: u64 = manifest.iter().map(|r| r.quantity).sum();

    println!("Benchmark: Combination Search ({})", name.to_uppercase());
    println!("  Locations: {}", groups.len());
    println!("  Listings: {}", groups.listing_count());
    println!("  Vehicles: {}", vehicles);
    println!();

    for policy in [PrefilterPolicy::HeadRequirement, PrefilterPolicy::LongestRequirement] {
        let config = SearchConfig::default().with_prefilter(policy);

        let start = Instant::now();
        let ranking = rank_locations(&groups, &manifest, &config);
        let elapsed = start.elapsed();
        let nodes_per_sec = ranking.statistics.nodes_explored as f64 / elapsed.as_secs_f64();

        println!("Results ({} pre-filter):", policy.as_str());
        println!("  Feasible locations: {}", ranking.entries.len());
        if let Some(best) = ranking.entries.first() {
            println!(
                "  Cheapest: {} at {} cents ({} listings)",
                best.location_id,
                best.total_price_in_cents,
                best.listing_ids.len()
            );
        }
        println!("  Time: {:.2?}", elapsed);
        println!("  Nodes/sec: {:.0}", nodes_per_sec);
        println!("{}", ranking.statistics);
        println!();
    }

    Ok(())
}
