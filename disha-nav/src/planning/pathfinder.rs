//! RRT path finding over the radar map.
//!
//! The finder plans over snapped cell centers: sampling draws uniformly
//! from the safe free cells, steering truncates to the growth distance and
//! snaps back to the grid, and connectivity is a clearance check of the
//! straight segment against the hindered cells. Because states are snapped,
//! exact point equality is sound for duplicate and goal detection.

use rand::Rng;

use smriti_map::{Bearing, Point2, RadarMap};

use super::astar::AStar;
use super::rrt::Rrt;

/// Robot body radius (m).
pub const ROBOT_RADIUS: f64 = 0.15;

/// Clearance margin for trajectories on `map`: the body radius plus half a
/// cell diagonal, so a cell center check covers the whole cell.
pub fn safety_margin(map: &RadarMap) -> f64 {
    ROBOT_RADIUS + map.topology().grid_size() / f64::sqrt(2.0)
}

/// RRT planner from the robot location to a goal cell set.
pub struct RrtPathFinder<'a> {
    map: &'a RadarMap,
    rrt: Rrt<'a, Point2>,
    safety: f64,
    remaining: usize,
}

impl<'a> RrtPathFinder<'a> {
    /// Plan toward the frontier of the unknown region.
    pub fn unknown_targets(
        map: &'a RadarMap,
        start: Point2,
        growth_distance: f64,
        max_iterations: usize,
        rng: impl Rng + 'a,
    ) -> Self {
        let topology = map.topology();
        let unknown = map.unknown_indices();
        let goals: Vec<Point2> = topology
            .contour(&unknown)
            .into_iter()
            .map(|index| topology.location(index))
            .collect();
        Self::with_goals(map, start, goals, growth_distance, max_iterations, rng)
    }

    /// Plan toward any unhindered cell within the `[min_distance,
    /// max_distance]` band of a marker, excluding the robot's own
    /// footprint.
    pub fn label_targets(
        map: &'a RadarMap,
        start: Point2,
        markers: &[Point2],
        min_distance: f64,
        max_distance: f64,
        growth_distance: f64,
        max_iterations: usize,
        rng: impl Rng + 'a,
    ) -> Self {
        let topology = map.topology();
        let goals: Vec<Point2> = topology
            .indices()
            .filter(|&index| !map.cell(index).hindered())
            .map(|index| topology.location(index))
            .filter(|location| {
                location.distance(&start) > ROBOT_RADIUS
                    && markers.iter().any(|marker| {
                        let distance = marker.distance(location);
                        distance >= min_distance && distance <= max_distance
                    })
            })
            .collect();
        Self::with_goals(map, start, goals, growth_distance, max_iterations, rng)
    }

    /// Plan toward the stalest mapped area: the empty cells around the
    /// minimum-echo-time empty cell within `max_distance` of the robot.
    pub fn least_explored_targets(
        map: &'a RadarMap,
        start: Point2,
        max_distance: f64,
        growth_distance: f64,
        max_iterations: usize,
        rng: impl Rng + 'a,
    ) -> Self {
        let topology = map.topology();
        let stalest = topology
            .indices()
            .filter(|&index| {
                map.cell(index).empty() && topology.location(index).distance(&start) <= max_distance
            })
            .min_by_key(|&index| map.cell(index).echo_time)
            .map(|index| topology.location(index));
        let goals: Vec<Point2> = match stalest {
            Some(stalest) => topology
                .indices()
                .filter(|&index| map.cell(index).empty())
                .map(|index| topology.location(index))
                .filter(|location| location.distance(&stalest) <= 2.0 * topology.grid_size())
                .collect(),
            None => Vec::new(),
        };
        Self::with_goals(map, start, goals, growth_distance, max_iterations, rng)
    }

    /// Build the finder with an explicit goal set.
    pub fn with_goals(
        map: &'a RadarMap,
        start: Point2,
        goals: Vec<Point2>,
        growth_distance: f64,
        max_iterations: usize,
        rng: impl Rng + 'a,
    ) -> Self {
        let safety = safety_margin(map);
        let topology = *map.topology();
        let free = map.safe_locations(safety);
        let mut rng = rng;
        let sampler = Box::new(move || {
            if free.is_empty() {
                None
            } else {
                Some(free[rng.gen_range(0..free.len())])
            }
        });
        let interpolate = Box::new(move |from: &Point2, to: &Point2| {
            let stepped = if from.distance(to) <= growth_distance {
                *to
            } else {
                Bearing::direction(from, to).at(from, growth_distance)
            };
            topology.snap(&stepped)
        });
        let distance = Box::new(|a: &Point2, b: &Point2| a.distance(b));
        let connected =
            Box::new(move |a: &Point2, b: &Point2| map.free_trajectory(a, b, safety));
        let is_goal = Box::new(move |point: &Point2| goals.iter().any(|goal| goal == point));
        let root = topology.snap(&start);
        Self {
            map,
            rrt: Rrt::new(root, sampler, interpolate, distance, connected, is_goal),
            safety,
            remaining: max_iterations,
        }
    }

    /// One growth round, bounded by the iteration budget.
    pub fn grow(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.rrt.grow();
        }
    }

    /// True once any goal has been reached.
    pub fn found(&self) -> bool {
        self.rrt.found()
    }

    /// True when the search is over: a goal was reached or the budget is
    /// spent.
    pub fn is_completed(&self) -> bool {
        self.rrt.found() || self.remaining == 0
    }

    /// The best path found: the shortest root-to-goal path, shortcut
    /// through every clear straight segment.
    pub fn path(&self) -> Option<Vec<Point2>> {
        let best = self
            .rrt
            .goals()
            .filter_map(|goal| self.rrt.path_to(goal))
            .min_by(|a, b| path_length(a).total_cmp(&path_length(b)))?;
        Some(self.optimise(best))
    }

    /// Shortcut a waypoint sequence: A* over the waypoint indices where any
    /// clear straight segment is an edge.
    fn optimise(&self, waypoints: Vec<Point2>) -> Vec<Point2> {
        if waypoints.len() <= 2 {
            return waypoints;
        }
        let last = waypoints.len() - 1;
        let found = {
            let points = &waypoints;
            let search: AStar<usize> = AStar::new(
                0,
                Box::new(move |&index: &usize| index == last),
                Box::new(move |&a: &usize, &b: &usize| points[a].distance(&points[b])),
                Box::new(move |&index: &usize| points[index].distance(&points[last])),
                Box::new(move |&index: &usize| {
                    (index + 1..=last)
                        .filter(|&next| {
                            self.map
                                .free_trajectory(&points[index], &points[next], self.safety)
                        })
                        .collect()
                }),
            );
            search.find()
        };
        match found {
            Some(indices) => indices.into_iter().map(|index| waypoints[index]).collect(),
            // Consecutive edges were clear when the tree grew, keep as is
            None => waypoints,
        }
    }
}

fn path_length(path: &[Point2]) -> f64 {
    path.windows(2).map(|pair| pair[0].distance(&pair[1])).sum()
}
