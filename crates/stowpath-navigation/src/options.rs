//! Per-request planning options and planner-wide tuning.

use stowpath_geometry::Fixed;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::snapshot::ZonePolicy;

/// Options for a single planning request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Side length of one grid cell (m).
    pub cell_size: Fixed,
    /// Clearance added around every obstacle (m).
    pub safety_margin: Fixed,
    /// Upper bound on node expansions for one search.
    pub max_iterations: usize,
    /// Allow the four diagonal moves.
    pub allow_diagonals: bool,
    /// Treat zones as obstacles.
    pub avoid_zones: bool,
    /// The single zone left open when `avoid_zones` is set.
    pub allowed_zone_id: Option<i64>,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            cell_size: Fixed::from_millis(500),
            safety_margin: Fixed::from_millis(250),
            max_iterations: 200_000,
            allow_diagonals: true,
            avoid_zones: false,
            allowed_zone_id: None,
        }
    }
}

impl PathOptions {
    /// Defaults for approaching a pallet: same grid, diagonals off.
    pub fn pallet_approach() -> Self {
        PathOptions {
            allow_diagonals: false,
            ..Self::default()
        }
    }

    /// Returns a copy with diagonals switched on or off.
    #[must_use]
    pub fn with_diagonals(self, allow_diagonals: bool) -> Self {
        PathOptions {
            allow_diagonals,
            ..self
        }
    }

    /// Zone policy for a search whose target sits in `target_zone`.
    ///
    /// With avoidance on and no zone explicitly allowed, the target's own
    /// zone stays open.
    pub fn zone_policy(&self, target_zone: Option<i64>) -> ZonePolicy {
        if !self.avoid_zones {
            return ZonePolicy::Ignore;
        }
        ZonePolicy::Avoid {
            allowed: self.allowed_zone_id.or(target_zone),
        }
    }

    /// Checks the numeric options.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` for a non-positive cell size, a
    ///   negative safety margin or a zero iteration cap.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !self.cell_size.is_positive() {
            return Err(PlannerError::InvalidRequest(
                "cell_size must be positive".to_string(),
            ));
        }
        if self.safety_margin.is_negative() {
            return Err(PlannerError::InvalidRequest(
                "safety_margin must not be negative".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(PlannerError::InvalidRequest(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Empirical planner constants, kept adjustable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerTuning {
    /// Turn penalty as a multiple of the cell size.
    pub turn_penalty_factor: Fixed,
    /// Distance from a rack face or pallet side to its standing point (m).
    pub standoff_distance: Fixed,
    /// Lateral inset from the ends of a face (m).
    pub side_margin: Fixed,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        PlannerTuning {
            turn_penalty_factor: Fixed::from_millis(1_500),
            standoff_distance: Fixed::from_millis(900),
            side_margin: Fixed::from_millis(400),
        }
    }
}

impl PlannerTuning {
    /// Checks that no constant is negative.
    ///
    /// # Errors
    /// * `PlannerError::InvalidRequest` naming the offending field.
    pub fn validate(&self) -> Result<(), PlannerError> {
        for (name, value) in [
            ("turn_penalty_factor", self.turn_penalty_factor),
            ("standoff_distance", self.standoff_distance),
            ("side_margin", self.side_margin),
        ] {
            if value.is_negative() {
                return Err(PlannerError::InvalidRequest(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }
        Ok(())
    }
}
