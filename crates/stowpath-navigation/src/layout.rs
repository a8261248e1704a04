//! Warehouse geometry as it comes out of storage.
//!
//! These records mirror the stored rows for one warehouse: the warehouse
//! itself, its zones, its racks with the shelves they own, and the pallets
//! with their footprint and placement. They carry no invariants; use
//! [`WarehouseSnapshot::build`](crate::snapshot::WarehouseSnapshot::build) to
//! validate them into something the planner can search.

use stowpath_geometry::Fixed;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stored geometry of one warehouse.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseLayout {
    /// Warehouse id.
    pub id: i64,
    /// Extent along `x` (m).
    pub length: Fixed,
    /// Extent along `z` (m).
    pub width: Fixed,
    /// Ceiling height (m). Not used for planning on a flat floor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Fixed,
    /// Check-in bay where pickers start by default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub checkin: Option<CheckinRecord>,
    /// Zones of the warehouse.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zones: Vec<ZoneRecord>,
    /// Racks of the warehouse.
    #[cfg_attr(feature = "serde", serde(default))]
    pub racks: Vec<RackRecord>,
    /// Pallets placed in the warehouse.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pallets: Vec<PalletRecord>,
}

/// The check-in bay rectangle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CheckinRecord {
    /// Minimum corner `x` (m).
    pub position_x: Fixed,
    /// Minimum corner `z` (m).
    pub position_z: Fixed,
    /// Extent along `x` (m).
    pub length: Fixed,
    /// Extent along `z` (m).
    pub width: Fixed,
}

/// A stored zone row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneRecord {
    /// Zone id.
    pub id: i64,
    /// Minimum corner `x` (m).
    pub position_x: Fixed,
    /// Minimum corner `z` (m).
    pub position_z: Fixed,
    /// Extent along `x` (m).
    pub length: Fixed,
    /// Extent along `z` (m).
    pub width: Fixed,
}

/// A stored rack row together with the ids of the shelves it owns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RackRecord {
    /// Rack id.
    pub id: i64,
    /// Minimum corner `x` of the unrotated footprint (m).
    pub position_x: Fixed,
    /// Minimum corner `z` of the unrotated footprint (m).
    pub position_z: Fixed,
    /// Extent along local `x` (m).
    pub length: Fixed,
    /// Extent along local `z` (m).
    pub width: Fixed,
    /// Rotation about the footprint center (rad).
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Fixed,
    /// Shelves mounted in this rack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shelf_ids: Vec<i64>,
}

/// A stored pallet joined with its placement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PalletRecord {
    /// Pallet id.
    pub id: i64,
    /// Pallet length (m).
    pub length: Fixed,
    /// Pallet width (m).
    pub width: Fixed,
    /// Minimum corner `x` of the unrotated footprint (m).
    pub position_x: Fixed,
    /// Minimum corner `z` of the unrotated footprint (m).
    pub position_z: Fixed,
    /// Rotation about the footprint center (rad).
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Fixed,
    /// Shelf holding the pallet, if it is stored in a rack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shelf_id: Option<i64>,
    /// Zone the pallet is assigned to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zone_id: Option<i64>,
}
