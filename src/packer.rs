//! Greedy lane packing for a single listing.
//!
//! A listing is split into `lane_count` lanes of capacity `length`. Lanes are
//! filled one at a time with a first-fit scan over the requirement list in its
//! current order: a unit is placed whenever it fits, otherwise the scan moves
//! on. The pass never reorders or backtracks, so the outcome depends on the
//! order of the requirements (longest first works best).

use crate::domain::{Listing, VehicleRequirement};

/// What a packing pass placed into one listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackingReport {
    /// Units placed over all lanes.
    pub units_placed: u64,
    /// Lanes holding at least one unit.
    pub lanes_used: u64,
}

/// Fills the lanes of `listing` in place, removing requirements whose
/// quantity reaches zero.
///
/// # Examples
///
/// ```
/// use parking_search::domain::{Listing, VehicleRequirement};
/// use parking_search::packer::fill_lanes;
///
/// // Two lanes of length 30.
/// let listing = Listing::new("lot", 30, 20, 500, "loc");
/// let mut remaining = vec![VehicleRequirement::new(20, 2), VehicleRequirement::new(10, 3)];
///
/// let report = fill_lanes(&listing, &mut remaining);
///
/// // Each lane takes one 20 and one 10.
/// assert_eq!(report.units_placed, 4);
/// assert_eq!(remaining, vec![VehicleRequirement::new(10, 1)]);
/// ```
pub fn fill_lanes(listing: &Listing, requirements: &mut Vec<VehicleRequirement>) -> PackingReport {
    let mut report = PackingReport::default();

    for _ in 0..listing.lane_count() {
        if requirements.is_empty() {
            break;
        }

        let mut remaining = listing.length;
        let mut idx = 0;
        let mut placed_in_lane = false;

        while remaining > 0 && idx < requirements.len() {
            let requirement = &mut requirements[idx];
            if requirement.length <= remaining && requirement.quantity > 0 {
                remaining -= requirement.length;
                requirement.quantity -= 1;
                report.units_placed += 1;
                placed_in_lane = true;
                if requirement.quantity == 0 {
                    requirements.remove(idx);
                }
            } else {
                idx += 1;
            }
        }

        if placed_in_lane {
            report.lanes_used += 1;
        }
    }

    report
}

/// Packs a copy of `requirements` into `listing` and returns what is left.
///
/// The caller's slice is never touched.
pub fn pack_listing(listing: &Listing, requirements: &[VehicleRequirement]) -> Vec<VehicleRequirement> {
    let mut remaining = requirements.to_vec();
    fill_lanes(listing, &mut remaining);
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(length: u64, width: u64) -> Listing {
        Listing::new("l", length, width, 100, "loc")
    }

    #[test]
    fn test_three_lanes_hold_three_vehicles() {
        let remaining = pack_listing(&listing(10, 30), &[VehicleRequirement::new(10, 3)]);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_exact_length_fits() {
        let remaining = pack_listing(&listing(20, 10), &[VehicleRequirement::new(20, 1)]);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_insufficient_lanes_leave_remainder() {
        let remaining = pack_listing(&listing(10, 20), &[VehicleRequirement::new(10, 3)]);
        assert_eq!(remaining, vec![VehicleRequirement::new(10, 1)]);
    }

    #[test]
    fn test_too_long_vehicle_is_skipped() {
        let remaining = pack_listing(&listing(10, 30), &[VehicleRequirement::new(20, 1)]);
        assert_eq!(remaining, vec![VehicleRequirement::new(20, 1)]);
    }

    #[test]
    fn test_lane_stacks_several_units_of_same_requirement() {
        // One lane of 50, two lanes total.
        let mut remaining = vec![VehicleRequirement::new(10, 5)];
        let report = fill_lanes(&listing(50, 20), &mut remaining);
        assert!(remaining.is_empty());
        assert_eq!(report.units_placed, 5);
        assert_eq!(report.lanes_used, 1);
    }

    #[test]
    fn test_first_fit_depends_on_order() {
        // Single lane of 30.
        let lot = listing(30, 10);

        let longest_first = pack_listing(
            &lot,
            &[VehicleRequirement::new(20, 1), VehicleRequirement::new(10, 1)],
        );
        assert!(longest_first.is_empty());

        // 10s first: three fill the lane and the 20 is left over.
        let shortest_first = pack_listing(
            &lot,
            &[VehicleRequirement::new(10, 3), VehicleRequirement::new(20, 1)],
        );
        assert_eq!(shortest_first, vec![VehicleRequirement::new(20, 1)]);
    }

    #[test]
    fn test_narrow_listing_has_no_lanes() {
        let mut remaining = vec![VehicleRequirement::new(5, 1)];
        let report = fill_lanes(&listing(100, 9), &mut remaining);
        assert_eq!(report, PackingReport::default());
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn test_caller_list_is_untouched() {
        let original = vec![VehicleRequirement::new(10, 2)];
        let _ = pack_listing(&listing(10, 10), &original);
        assert_eq!(original, vec![VehicleRequirement::new(10, 2)]);
    }
}
