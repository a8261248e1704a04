//! Standing points: where a picker stops to reach a pallet.
//!
//! A pallet on a shelf is reached from the front or back face of its rack. A
//! pallet on the floor is reached from one of its four sides.

use stowpath_geometry::{Aabb, Fixed, Point2D};

use crate::options::PlannerTuning;
use crate::snapshot::{Footprint, PalletPlacement, Rack, WarehouseSnapshot};

/// One of the four sides of a floor pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Towards negative `x`.
    Left,
    /// Towards positive `x`.
    Right,
    /// Towards negative `z`.
    Front,
    /// Towards positive `z`.
    Back,
}

/// A standing point next to a floor pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Side of the pallet the point faces.
    pub side: Side,
    /// The standing point.
    pub point: Point2D,
}

/// Clamps `value` into `[lo, hi]`, or returns the midpoint when the range is
/// empty.
fn clamp_lateral(value: Fixed, lo: Fixed, hi: Fixed) -> Fixed {
    if lo > hi {
        return (lo + hi).div_int(2);
    }
    value.max(lo).min(hi)
}

/// Standing point in front of or behind `rack` for `pallet`.
///
/// Each face gets a point `standoff_distance` outside it, level with the
/// pallet along the rack but at least `side_margin` from either end, kept
/// inside the warehouse and, when the pallet belongs to a known zone, inside
/// that zone. Of the points that stay clear of the rack's bounds, the one
/// closer to `source` wins (the front face on a tie). If both fall on the
/// rack, the unclamped point of the closer face is used.
pub fn rack_standing_point(
    snapshot: &WarehouseSnapshot,
    rack: &Rack,
    pallet: &PalletPlacement,
    source: Point2D,
    tuning: &PlannerTuning,
) -> Point2D {
    let area = rack.footprint();

    // Pallet center in the rack's unrotated frame.
    let (sin, cos) = area.rotation.sin_cos();
    let local = pallet.footprint().center().rotate_about(area.center(), -sin, cos) - area.position;

    let lateral = clamp_lateral(local.x, tuning.side_margin, area.length - tuning.side_margin);
    let front = area.local_to_world(Point2D::new(lateral, -tuning.standoff_distance));
    let back = area.local_to_world(Point2D::new(lateral, area.width + tuning.standoff_distance));

    let zone = pallet.zone_id.and_then(|id| snapshot.zone(id)).map(|zone| zone.bounding_box());
    let clamp = |point: Point2D| {
        let inside = snapshot.bounds().clamp_point(point);
        match zone {
            Some(zone) => zone.clamp_point(inside),
            None => inside,
        }
    };

    let rack_bounds = rack.bounding_box();
    let closer = |a: Point2D, b: Point2D| if source.distance(b) < source.distance(a) { b } else { a };

    match [clamp(front), clamp(back)].map(|point| Some(point).filter(|p| !rack_bounds.contains(*p))) {
        [Some(front), Some(back)] => closer(front, back),
        [Some(front), None] => front,
        [None, Some(back)] => back,
        [None, None] => closer(front, back),
    }
}

/// Standing points on the four sides of a floor pallet, in the order left,
/// right, front, back. Points outside the warehouse are dropped.
///
/// Each point is `standoff_distance` away from the pallet's bounds. Along the
/// side it follows `source`, kept at least `side_margin` from the corners.
pub fn ground_candidates(
    snapshot: &WarehouseSnapshot,
    pallet: &PalletPlacement,
    source: Point2D,
    tuning: &PlannerTuning,
) -> Vec<Candidate> {
    let bounds: Aabb = pallet.bounding_box();
    let standoff = tuning.standoff_distance;
    let margin = tuning.side_margin;

    let along_x = clamp_lateral(source.x, bounds.min.x + margin, bounds.max.x - margin);
    let along_z = clamp_lateral(source.z, bounds.min.z + margin, bounds.max.z - margin);

    let floor = snapshot.bounds();
    [
        (Side::Left, Point2D::new(bounds.min.x - standoff, along_z)),
        (Side::Right, Point2D::new(bounds.max.x + standoff, along_z)),
        (Side::Front, Point2D::new(along_x, bounds.min.z - standoff)),
        (Side::Back, Point2D::new(along_x, bounds.max.z + standoff)),
    ]
    .into_iter()
    .filter(|(_, point)| floor.contains(*point))
    .map(|(side, point)| Candidate { side, point })
    .collect()
}
