//! Planning results.

use std::fmt;

use stowpath_geometry::{Fixed, Point2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The outcome of one path search.
///
/// A search that finds no path is not an error; check `success`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    /// Whether a path was found.
    pub success: bool,
    /// Waypoints from start to goal, collinear runs merged.
    pub points: Vec<Point2D>,
    /// Total Euclidean length of the waypoint chain (m).
    pub distance: Fixed,
    /// Number of nodes expanded.
    pub explored_nodes: usize,
    /// Why the search failed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error_message: Option<String>,
}

impl PathResult {
    /// Creates a result for a found path.
    pub fn found(points: Vec<Point2D>, distance: Fixed, explored_nodes: usize) -> Self {
        PathResult {
            success: true,
            points,
            distance,
            explored_nodes,
            error_message: None,
        }
    }

    /// Creates a failed result carrying `message`.
    pub fn failure(message: impl Into<String>, explored_nodes: usize) -> Self {
        PathResult {
            success: false,
            points: Vec::new(),
            distance: Fixed::ZERO,
            explored_nodes,
            error_message: Some(message.into()),
        }
    }

    /// Creates the result of a search that ran out of nodes or iterations.
    pub fn no_path(explored_nodes: usize) -> Self {
        Self::failure(NO_PATH_MESSAGE, explored_nodes)
    }

    /// First waypoint, if any.
    pub fn start(&self) -> Option<Point2D> {
        self.points.first().copied()
    }

    /// Last waypoint, if any.
    pub fn end(&self) -> Option<Point2D> {
        self.points.last().copied()
    }
}

/// Message of a search that did not reach its goal.
pub const NO_PATH_MESSAGE: &str = "No path found";

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "PathResult {{ success: true, waypoints: {}, distance: {}, explored_nodes: {} }}",
                self.points.len(),
                self.distance,
                self.explored_nodes
            )
        } else {
            write!(
                f,
                "PathResult {{ success: false, explored_nodes: {}, error: {} }}",
                self.explored_nodes,
                self.error_message.as_deref().unwrap_or("unknown")
            )
        }
    }
}

/// The outcome of a multi-stop request.
///
/// `success` reports whether the batch was processed at all; individual legs
/// carry their own flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiPathResult {
    /// Whether the batch ran.
    pub success: bool,
    /// One result per requested target, in request order.
    pub paths: Vec<PathResult>,
    /// Sum of the distances of the successful legs (m).
    pub total_distance: Fixed,
    /// Sum of the explored nodes of every leg.
    pub total_explored_nodes: usize,
    /// Why the batch did not run.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error_message: Option<String>,
}

impl MultiPathResult {
    /// Creates an empty, successful batch.
    pub fn new() -> Self {
        MultiPathResult {
            success: true,
            ..Default::default()
        }
    }

    /// Creates a batch that could not run at all.
    pub fn failure(message: impl Into<String>) -> Self {
        MultiPathResult {
            success: false,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Appends a leg and folds it into the totals.
    pub fn push_leg(&mut self, leg: PathResult) {
        if leg.success {
            self.total_distance += leg.distance;
        }
        self.total_explored_nodes += leg.explored_nodes;
        self.paths.push(leg);
    }

    /// Number of legs that found a path.
    pub fn successful_legs(&self) -> usize {
        self.paths.iter().filter(|leg| leg.success).count()
    }
}

impl fmt::Display for MultiPathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiPathResult {{ success: {}, legs: {}/{}, total_distance: {}, total_explored_nodes: {} }}",
            self.success,
            self.successful_legs(),
            self.paths.len(),
            self.total_distance,
            self.total_explored_nodes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_leg_totals() {
        let mut batch = MultiPathResult::new();
        batch.push_leg(PathResult::found(
            vec![Point2D::ORIGIN, Point2D::from_millis(3_000, 4_000)],
            Fixed::from_int(5),
            12,
        ));
        batch.push_leg(PathResult::failure("Pallet 9 not found", 0));
        batch.push_leg(PathResult::no_path(40));

        assert!(batch.success);
        assert_eq!(batch.paths.len(), 3);
        assert_eq!(batch.successful_legs(), 1);
        assert_eq!(batch.total_distance, Fixed::from_int(5));
        assert_eq!(batch.total_explored_nodes, 52);
    }

    #[test]
    fn test_display() {
        let found = PathResult::found(vec![Point2D::ORIGIN], Fixed::ZERO, 1);
        assert!(format!("{}", found).contains("success: true"));

        let failed = PathResult::no_path(7);
        let text = format!("{}", failed);
        assert!(text.contains("success: false"));
        assert!(text.contains(NO_PATH_MESSAGE));

        let batch = MultiPathResult::failure("Warehouse 3 not found");
        assert!(format!("{}", batch).contains("legs: 0/0"));
    }

    #[test]
    fn test_endpoints() {
        let result = PathResult::found(
            vec![Point2D::ORIGIN, Point2D::from_millis(1_000, 0)],
            Fixed::ONE,
            2,
        );
        assert_eq!(result.start(), Some(Point2D::ORIGIN));
        assert_eq!(result.end(), Some(Point2D::from_millis(1_000, 0)));
        assert_eq!(PathResult::no_path(0).end(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_failed_result_serializes_message() {
        let json = serde_json::to_string(&PathResult::no_path(3)).unwrap();
        assert!(json.contains("\"error_message\":\"No path found\""));
        let ok = serde_json::to_string(&PathResult::found(vec![], Fixed::ZERO, 0)).unwrap();
        assert!(!ok.contains("error_message"));
    }
}
