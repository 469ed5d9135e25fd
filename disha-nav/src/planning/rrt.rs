//! Generic rapidly-exploring random tree.
//!
//! The tree is generic over the state type and takes every domain decision
//! as an injected strategy, so the same growth loop serves continuous
//! world-space planning and any discrete variant. Nodes live in an arena
//! indexed by position; each node stores its parent index, so a path is
//! recovered by walking parent links.

/// One tree node.
struct Node<T> {
    value: T,
    parent: Option<usize>,
}

/// A rapidly-exploring random tree.
///
/// Growth is deterministic for a deterministic sampler: the tree itself
/// draws no randomness.
pub struct Rrt<'a, T: Clone + PartialEq> {
    nodes: Vec<Node<T>>,
    /// Indices of nodes satisfying the goal predicate, in insertion order.
    goals: Vec<usize>,
    sampler: Box<dyn FnMut() -> Option<T> + 'a>,
    interpolate: Box<dyn Fn(&T, &T) -> T + 'a>,
    distance: Box<dyn Fn(&T, &T) -> f64 + 'a>,
    connected: Box<dyn Fn(&T, &T) -> bool + 'a>,
    is_goal: Box<dyn Fn(&T) -> bool + 'a>,
}

impl<'a, T: Clone + PartialEq> Rrt<'a, T> {
    /// Create a tree holding only `root`.
    pub fn new(
        root: T,
        sampler: Box<dyn FnMut() -> Option<T> + 'a>,
        interpolate: Box<dyn Fn(&T, &T) -> T + 'a>,
        distance: Box<dyn Fn(&T, &T) -> f64 + 'a>,
        connected: Box<dyn Fn(&T, &T) -> bool + 'a>,
        is_goal: Box<dyn Fn(&T) -> bool + 'a>,
    ) -> Self {
        let goals = if is_goal(&root) { vec![0] } else { Vec::new() };
        Self {
            nodes: vec![Node {
                value: root,
                parent: None,
            }],
            goals,
            sampler,
            interpolate,
            distance,
            connected,
            is_goal,
        }
    }

    /// Attempt one growth round.
    ///
    /// Draws a sample, steers from the nearest node toward it, and inserts
    /// the result when it is new and reachable. An unproductive round (no
    /// sample, duplicate state, or blocked edge) returns `None`; the tree
    /// is unchanged and the caller is free to try again.
    pub fn grow(&mut self) -> Option<&T> {
        let sample = (self.sampler)()?;
        let nearest = self.nearest(&sample);
        let new = (self.interpolate)(&self.nodes[nearest].value, &sample);
        if self.contains(&new) {
            return None;
        }
        if !(self.connected)(&self.nodes[nearest].value, &new) {
            return None;
        }
        if (self.is_goal)(&new) {
            self.goals.push(self.nodes.len());
        }
        self.nodes.push(Node {
            value: new,
            parent: Some(nearest),
        });
        self.nodes.last().map(|node| &node.value)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True once at least one goal node has been inserted.
    pub fn found(&self) -> bool {
        !self.goals.is_empty()
    }

    /// The goal states reached so far. The set only ever grows.
    pub fn goals(&self) -> impl Iterator<Item = &T> {
        self.goals.iter().map(|&index| &self.nodes[index].value)
    }

    /// The root-to-`target` path, or `None` when `target` is not in the
    /// tree.
    pub fn path_to(&self, target: &T) -> Option<Vec<T>> {
        let mut index = self.nodes.iter().position(|node| node.value == *target)?;
        let mut path = vec![self.nodes[index].value.clone()];
        while let Some(parent) = self.nodes[index].parent {
            path.push(self.nodes[parent].value.clone());
            index = parent;
        }
        path.reverse();
        Some(path)
    }

    fn contains(&self, value: &T) -> bool {
        self.nodes.iter().any(|node| node.value == *value)
    }

    fn nearest(&self, sample: &T) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, node) in self.nodes.iter().enumerate() {
            let distance = (self.distance)(&node.value, sample);
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1-D integer line: steer one unit toward the sample, wall at 5.
    fn line_rrt<'a>(samples: Vec<i64>, wall: i64, goal: i64) -> Rrt<'a, i64> {
        let mut samples = samples.into_iter();
        Rrt::new(
            0,
            Box::new(move || samples.next()),
            Box::new(|from, to| from + (to - from).signum()),
            Box::new(|a, b| (a - b).abs() as f64),
            Box::new(move |_, to| *to != wall),
            Box::new(move |value| *value == goal),
        )
    }

    #[test]
    fn test_grow_steers_and_finds_goal() {
        let mut rrt = line_rrt(vec![3, 3, 3], 100, 3);
        assert_eq!(rrt.grow(), Some(&1));
        assert_eq!(rrt.grow(), Some(&2));
        assert!(!rrt.found());
        assert_eq!(rrt.grow(), Some(&3));
        assert!(rrt.found());
        assert_eq!(rrt.path_to(&3), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_duplicate_round_is_unproductive() {
        let mut rrt = line_rrt(vec![1, 1], 100, 10);
        assert_eq!(rrt.grow(), Some(&1));
        assert_eq!(rrt.grow(), None);
        assert_eq!(rrt.len(), 2);
    }

    #[test]
    fn test_blocked_edge_is_unproductive() {
        let mut rrt = line_rrt(vec![5], 1, 10);
        assert_eq!(rrt.grow(), None);
        assert_eq!(rrt.len(), 1);
    }

    #[test]
    fn test_exhausted_sampler() {
        let mut rrt = line_rrt(vec![], 100, 10);
        assert_eq!(rrt.grow(), None);
    }

    #[test]
    fn test_root_may_be_goal() {
        let rrt = line_rrt(vec![], 100, 0);
        assert!(rrt.found());
        assert_eq!(rrt.path_to(&0), Some(vec![0]));
    }

    #[test]
    fn test_path_to_absent_state() {
        let rrt = line_rrt(vec![], 100, 10);
        assert_eq!(rrt.path_to(&7), None);
    }
}
