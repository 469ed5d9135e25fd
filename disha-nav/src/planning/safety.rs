//! Discrete safe-grid planner.
//!
//! Inflates every hindered cell by a safety margin into a prohibited set,
//! then runs A* over the remaining 8-connected cells. Complements the RRT
//! finder: given a concrete target it yields the cost-optimal grid path or
//! a definite "unreachable".

use std::collections::HashSet;

use smriti_map::{Point2, RadarMap};

use super::astar::AStar;

/// Grid A* from the robot to a target, avoiding inflated obstacles.
pub struct SafePlanner<'a> {
    map: &'a RadarMap,
    prohibited: HashSet<(i32, i32)>,
}

impl<'a> SafePlanner<'a> {
    /// Build the prohibited set: every cell within `safe_distance` of a
    /// hindered cell.
    pub fn new(map: &'a RadarMap, safe_distance: f64) -> Self {
        let topology = map.topology();
        let width = topology.width() as i32;
        let height = topology.height() as i32;
        let grid_size = topology.grid_size();
        let reach = (safe_distance / grid_size).ceil() as i32;
        let mut prohibited = HashSet::new();
        for index in topology.indices() {
            if !map.cell(index).hindered() {
                continue;
            }
            let col = (index % topology.width()) as i32;
            let row = (index / topology.width()) as i32;
            for dr in -reach..=reach {
                for dc in -reach..=reach {
                    let squared = ((dc * dc + dr * dr) as f64) * grid_size * grid_size;
                    if squared > safe_distance * safe_distance {
                        continue;
                    }
                    let (nc, nr) = (col + dc, row + dr);
                    if nc >= 0 && nr >= 0 && nc < width && nr < height {
                        prohibited.insert((nc, nr));
                    }
                }
            }
        }
        Self { map, prohibited }
    }

    /// Number of prohibited cells.
    pub fn prohibited_len(&self) -> usize {
        self.prohibited.len()
    }

    /// The optimal clear path from `from` to `to` as world waypoints, or
    /// `None` when `to` is outside the grid, prohibited, or unreachable.
    ///
    /// The start cell itself is always allowed, so a robot standing inside
    /// the inflated margin can still plan its way out.
    pub fn find_path(&self, from: &Point2, to: &Point2) -> Option<Vec<Point2>> {
        let topology = self.map.topology();
        let width = topology.width() as i32;
        let height = topology.height() as i32;
        let start = self.coords(topology.index_of(from)?);
        let goal = self.coords(topology.index_of(to)?);
        if self.prohibited.contains(&goal) {
            return None;
        }
        let prohibited = &self.prohibited;
        let cells = AStar::new(
            start,
            Box::new(move |node: &(i32, i32)| *node == goal),
            Box::new(|a: &(i32, i32), b: &(i32, i32)| {
                let (dx, dy) = (b.0 - a.0, b.1 - a.1);
                ((dx * dx + dy * dy) as f64).sqrt()
            }),
            Box::new(move |node: &(i32, i32)| {
                let (dx, dy) = (goal.0 - node.0, goal.1 - node.1);
                ((dx * dx + dy * dy) as f64).sqrt()
            }),
            Box::new(move |node: &(i32, i32)| {
                let mut successors = Vec::with_capacity(8);
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let next = (node.0 + dc, node.1 + dr);
                        if next.0 >= 0
                            && next.1 >= 0
                            && next.0 < width
                            && next.1 < height
                            && !prohibited.contains(&next)
                        {
                            successors.push(next);
                        }
                    }
                }
                successors
            }),
        )
        .find()?;
        Some(
            cells
                .into_iter()
                .map(|(col, row)| topology.location(row as usize * topology.width() + col as usize))
                .collect(),
        )
    }

    fn coords(&self, index: usize) -> (i32, i32) {
        let width = self.map.topology().width();
        ((index % width) as i32, (index / width) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smriti_map::{Bearing, RadarConfig, SensorSignal};

    /// 21x21 map with an echogenic wall at y = 1.0 spanning `x_range`.
    fn walled_map(x_range: std::ops::RangeInclusive<i32>) -> RadarMap {
        let mut map = RadarMap::new(RadarConfig {
            width: 21,
            height: 21,
            ..Default::default()
        })
        .unwrap();
        for step in x_range {
            let x = step as f64 * 0.2;
            map.update_echo(&SensorSignal {
                location: Point2::new(x, 0.0),
                direction: Bearing::NORTH,
                distance: 1.0,
                time: 1000,
            });
        }
        map
    }

    #[test]
    fn test_detours_around_wall() {
        let map = walled_map(-5..=5);
        let planner = SafePlanner::new(&map, 0.25);
        let from = Point2::ZERO;
        let to = Point2::new(0.0, 2.0);
        let path = planner.find_path(&from, &to).expect("no path around wall");
        assert_eq!(path[0], Point2::ZERO);
        assert_eq!(*path.last().unwrap(), to);
        // The detour must swing wide of the wall span
        assert!(path.iter().any(|p| p.x.abs() > 1.4));
        // And never touch a prohibited cell except possibly the start
        let topology = map.topology();
        for point in &path[1..] {
            let index = topology.index_of(point).unwrap();
            assert!(!map.cell(index).hindered());
        }
    }

    #[test]
    fn test_full_wall_is_unreachable() {
        let map = walled_map(-10..=10);
        let planner = SafePlanner::new(&map, 0.25);
        let path = planner.find_path(&Point2::ZERO, &Point2::new(0.0, 2.0));
        assert!(path.is_none());
    }

    #[test]
    fn test_out_of_bounds_target_is_none() {
        let map = walled_map(-5..=5);
        let planner = SafePlanner::new(&map, 0.25);
        assert!(planner
            .find_path(&Point2::ZERO, &Point2::new(9.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_prohibited_target_is_none() {
        let map = walled_map(-5..=5);
        let planner = SafePlanner::new(&map, 0.25);
        assert!(planner
            .find_path(&Point2::ZERO, &Point2::new(0.0, 1.0))
            .is_none());
    }

    #[test]
    fn test_open_map_is_straight() {
        let map = RadarMap::new(RadarConfig {
            width: 21,
            height: 21,
            ..Default::default()
        })
        .unwrap();
        let planner = SafePlanner::new(&map, 0.25);
        assert_eq!(planner.prohibited_len(), 0);
        let path = planner
            .find_path(&Point2::ZERO, &Point2::new(0.0, 1.0))
            .unwrap();
        // Five cells straight north
        assert_eq!(path.len(), 6);
    }
}
