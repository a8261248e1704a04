//! Request-scoped, read-only view of a warehouse's static geometry.

use std::collections::BTreeMap;

use stowpath_geometry::{Aabb, Fixed, OrientedRect, Point2D};

use crate::error::PlannerError;
use crate::layout::WarehouseLayout;

/// Anything with a footprint on the warehouse floor.
pub trait Footprint {
    /// The footprint rectangle, including its rotation.
    fn footprint(&self) -> &OrientedRect;

    /// Axis-aligned bounds of the rotated footprint.
    fn bounding_box(&self) -> Aabb {
        self.footprint().bounding_box()
    }
}

/// A zone of the warehouse floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Zone id.
    pub id: i64,
    /// Zone rectangle, never rotated.
    pub area: OrientedRect,
}

impl Footprint for Zone {
    fn footprint(&self) -> &OrientedRect {
        &self.area
    }
}

/// A rack and the shelves it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Rack {
    /// Rack id.
    pub id: i64,
    /// Rack footprint.
    pub area: OrientedRect,
    /// Shelves mounted in this rack.
    pub shelf_ids: Vec<i64>,
}

impl Footprint for Rack {
    fn footprint(&self) -> &OrientedRect {
        &self.area
    }
}

/// A placed pallet.
#[derive(Debug, Clone, PartialEq)]
pub struct PalletPlacement {
    /// Pallet id.
    pub id: i64,
    /// Pallet footprint at its placement.
    pub area: OrientedRect,
    /// Shelf holding the pallet, `None` for pallets standing on the floor.
    pub shelf_id: Option<i64>,
    /// Zone the pallet is assigned to.
    pub zone_id: Option<i64>,
}

impl Footprint for PalletPlacement {
    fn footprint(&self) -> &OrientedRect {
        &self.area
    }
}

/// Whether zones block travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZonePolicy {
    /// Zones are navigable floor.
    #[default]
    Ignore,
    /// Every zone is an obstacle except `allowed`.
    Avoid {
        /// The one zone that stays open.
        allowed: Option<i64>,
    },
}

/// The closed set of things the rasterizer blocks cells for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle<'a> {
    /// A zone, when zones are avoided.
    Zone(&'a Zone),
    /// A rack.
    Rack(&'a Rack),
    /// A pallet.
    Pallet(&'a PalletPlacement),
}

impl Obstacle<'_> {
    /// Axis-aligned bounds of the obstacle, rotation included.
    pub fn bounds(&self) -> Aabb {
        match self {
            Obstacle::Zone(zone) => zone.bounding_box(),
            Obstacle::Rack(rack) => rack.bounding_box(),
            Obstacle::Pallet(pallet) => pallet.bounding_box(),
        }
    }

    /// Short name of the obstacle kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Obstacle::Zone(_) => "zone",
            Obstacle::Rack(_) => "rack",
            Obstacle::Pallet(_) => "pallet",
        }
    }

    /// Id of the underlying zone, rack or pallet.
    pub fn id(&self) -> i64 {
        match self {
            Obstacle::Zone(zone) => zone.id,
            Obstacle::Rack(rack) => rack.id,
            Obstacle::Pallet(pallet) => pallet.id,
        }
    }
}

/// Immutable geometry of one warehouse, built fresh for each request.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseSnapshot {
    warehouse_id: i64,
    length: Fixed,
    width: Fixed,
    height: Fixed,
    checkin: Option<Aabb>,
    zones: Vec<Zone>,
    racks: Vec<Rack>,
    pallets: Vec<PalletPlacement>,
    pallet_index: BTreeMap<i64, usize>,
    zone_index: BTreeMap<i64, usize>,
    rack_by_shelf: BTreeMap<i64, usize>,
}

impl WarehouseSnapshot {
    /// Validates stored records and builds the lookup tables.
    ///
    /// # Errors
    /// * `PlannerError::InvalidLayout` if the warehouse has no floor area, a
    ///   size is negative, an id repeats, or a shelf is owned by two racks.
    pub fn build(layout: &WarehouseLayout) -> Result<Self, PlannerError> {
        let invalid = |msg: String| Err(PlannerError::InvalidLayout(msg));

        if !layout.length.is_positive() || !layout.width.is_positive() {
            return invalid(format!(
                "warehouse {} must have a positive length and width",
                layout.id
            ));
        }

        let checkin = match &layout.checkin {
            Some(bay) if bay.length.is_negative() || bay.width.is_negative() => {
                return invalid("check-in bay size must not be negative".to_string());
            }
            Some(bay) => Some(Aabb::from_corners(
                Point2D::new(bay.position_x, bay.position_z),
                Point2D::new(bay.position_x + bay.length, bay.position_z + bay.width),
            )),
            None => None,
        };

        let mut zones = Vec::with_capacity(layout.zones.len());
        let mut zone_index = BTreeMap::new();
        for record in &layout.zones {
            check_size("zone", record.id, record.length, record.width)?;
            if zone_index.insert(record.id, zones.len()).is_some() {
                return invalid(format!("duplicate zone id {}", record.id));
            }
            zones.push(Zone {
                id: record.id,
                area: OrientedRect::axis_aligned(
                    Point2D::new(record.position_x, record.position_z),
                    record.length,
                    record.width,
                ),
            });
        }

        let mut racks = Vec::with_capacity(layout.racks.len());
        let mut rack_ids = BTreeMap::new();
        let mut rack_by_shelf = BTreeMap::new();
        for record in &layout.racks {
            check_size("rack", record.id, record.length, record.width)?;
            if rack_ids.insert(record.id, racks.len()).is_some() {
                return invalid(format!("duplicate rack id {}", record.id));
            }
            for &shelf_id in &record.shelf_ids {
                if rack_by_shelf.insert(shelf_id, racks.len()).is_some() {
                    return invalid(format!("shelf {} is owned by more than one rack", shelf_id));
                }
            }
            racks.push(Rack {
                id: record.id,
                area: OrientedRect::new(
                    Point2D::new(record.position_x, record.position_z),
                    record.length,
                    record.width,
                    record.rotation,
                ),
                shelf_ids: record.shelf_ids.clone(),
            });
        }

        let mut pallets = Vec::with_capacity(layout.pallets.len());
        let mut pallet_index = BTreeMap::new();
        for record in &layout.pallets {
            check_size("pallet", record.id, record.length, record.width)?;
            if pallet_index.insert(record.id, pallets.len()).is_some() {
                return invalid(format!("duplicate pallet id {}", record.id));
            }
            pallets.push(PalletPlacement {
                id: record.id,
                area: OrientedRect::new(
                    Point2D::new(record.position_x, record.position_z),
                    record.length,
                    record.width,
                    record.rotation,
                ),
                shelf_id: record.shelf_id,
                zone_id: record.zone_id,
            });
        }

        Ok(WarehouseSnapshot {
            warehouse_id: layout.id,
            length: layout.length,
            width: layout.width,
            height: layout.height,
            checkin,
            zones,
            racks,
            pallets,
            pallet_index,
            zone_index,
            rack_by_shelf,
        })
    }

    /// Id of the warehouse this snapshot was built from.
    pub fn warehouse_id(&self) -> i64 {
        self.warehouse_id
    }

    /// Extent along `x` (m).
    pub fn length(&self) -> Fixed {
        self.length
    }

    /// Extent along `z` (m).
    pub fn width(&self) -> Fixed {
        self.width
    }

    /// Ceiling height (m).
    pub fn height(&self) -> Fixed {
        self.height
    }

    /// The floor rectangle `[0, length] x [0, width]`.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_corners(Point2D::ORIGIN, Point2D::new(self.length, self.width))
    }

    /// Center of the check-in bay, if the warehouse has one.
    pub fn checkin_center(&self) -> Option<Point2D> {
        self.checkin.map(|bay| bay.center())
    }

    /// Where a picker starts when the caller gives no start: the check-in bay
    /// center, or the origin.
    pub fn default_start(&self) -> Point2D {
        self.checkin_center().unwrap_or(Point2D::ORIGIN)
    }

    /// All zones in stored order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// All racks in stored order.
    pub fn racks(&self) -> &[Rack] {
        &self.racks
    }

    /// All pallets in stored order.
    pub fn pallets(&self) -> &[PalletPlacement] {
        &self.pallets
    }

    /// Looks up a pallet placement by pallet id.
    pub fn pallet(&self, pallet_id: i64) -> Option<&PalletPlacement> {
        self.pallet_index.get(&pallet_id).map(|&i| &self.pallets[i])
    }

    /// Looks up a zone by id.
    pub fn zone(&self, zone_id: i64) -> Option<&Zone> {
        self.zone_index.get(&zone_id).map(|&i| &self.zones[i])
    }

    /// The rack owning `shelf_id`.
    pub fn rack_for_shelf(&self, shelf_id: i64) -> Option<&Rack> {
        self.rack_by_shelf.get(&shelf_id).map(|&i| &self.racks[i])
    }

    /// Every obstacle to rasterize: all racks, all pallets, and the zones the
    /// policy asks to avoid.
    pub fn obstacles(&self, policy: ZonePolicy) -> Vec<Obstacle<'_>> {
        let zones = self.zones.iter().filter(move |zone| match policy {
            ZonePolicy::Ignore => false,
            ZonePolicy::Avoid { allowed } => allowed != Some(zone.id),
        });

        zones
            .map(Obstacle::Zone)
            .chain(self.racks.iter().map(Obstacle::Rack))
            .chain(self.pallets.iter().map(Obstacle::Pallet))
            .collect()
    }
}

fn check_size(kind: &str, id: i64, length: Fixed, width: Fixed) -> Result<(), PlannerError> {
    if length.is_negative() || width.is_negative() {
        return Err(PlannerError::InvalidLayout(format!(
            "{} {} has a negative size",
            kind, id
        )));
    }
    Ok(())
}
