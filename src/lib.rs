//! Parking Search
//!
//! Finds, for every parking location, the cheapest set of listings that can
//! hold a vehicle manifest, and ranks the locations by that price.
//!
//! # Domain Model
//!
//! - [`VehicleRequirement`](domain::VehicleRequirement): Vehicles of one length and how many
//! - [`Listing`](domain::Listing): Rectangular space split into 10-unit lanes
//! - [`LocationGroups`](domain::LocationGroups): Listings grouped by location
//! - [`RankedLocation`](domain::RankedLocation): Cheapest combination at a location
//!
//! # Search
//!
//! - **Lane packing** ([`packer`]): Greedy first-fit of vehicles into lanes
//! - **Combination search** ([`search`]): Exhaustive search with price bound
//! - **Ranking** ([`ranker`]): Cheapest feasible combination per location, by price

pub mod api;
pub mod config;
pub mod console;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod loader;
pub mod packer;
pub mod ranker;
pub mod search;
