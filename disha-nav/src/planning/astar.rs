//! Generic A* graph search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Heap entry ordered by ascending f-score.
struct OpenEntry<T> {
    f_score: f64,
    g_score: f64,
    node: T,
}

impl<T> PartialEq for OpenEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<T> Eq for OpenEntry<T> {}

impl<T> PartialOrd for OpenEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for OpenEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, invert for lowest-f-first
        other.f_score.total_cmp(&self.f_score)
    }
}

/// A* search over any hashable node type, strategies injected as closures.
///
/// With an admissible estimate the returned path is cost-optimal. An
/// unreachable goal is an ordinary `None`, never a failure.
pub struct AStar<'a, T: Clone + Eq + Hash> {
    start: T,
    is_goal: Box<dyn Fn(&T) -> bool + 'a>,
    cost: Box<dyn Fn(&T, &T) -> f64 + 'a>,
    estimate: Box<dyn Fn(&T) -> f64 + 'a>,
    successors: Box<dyn Fn(&T) -> Vec<T> + 'a>,
}

impl<'a, T: Clone + Eq + Hash> AStar<'a, T> {
    pub fn new(
        start: T,
        is_goal: Box<dyn Fn(&T) -> bool + 'a>,
        cost: Box<dyn Fn(&T, &T) -> f64 + 'a>,
        estimate: Box<dyn Fn(&T) -> f64 + 'a>,
        successors: Box<dyn Fn(&T) -> Vec<T> + 'a>,
    ) -> Self {
        Self {
            start,
            is_goal,
            cost,
            estimate,
            successors,
        }
    }

    /// Run the search to completion.
    pub fn find(&self) -> Option<Vec<T>> {
        let mut open = BinaryHeap::new();
        let mut g_scores: HashMap<T, f64> = HashMap::new();
        let mut came_from: HashMap<T, T> = HashMap::new();

        g_scores.insert(self.start.clone(), 0.0);
        open.push(OpenEntry {
            f_score: (self.estimate)(&self.start),
            g_score: 0.0,
            node: self.start.clone(),
        });

        while let Some(entry) = open.pop() {
            // Superseded by a cheaper route found after this entry was
            // queued
            match g_scores.get(&entry.node) {
                Some(&g) if g < entry.g_score => continue,
                _ => {}
            }
            if (self.is_goal)(&entry.node) {
                return Some(self.reconstruct(&came_from, entry.node));
            }
            for successor in (self.successors)(&entry.node) {
                let tentative = entry.g_score + (self.cost)(&entry.node, &successor);
                let better = g_scores
                    .get(&successor)
                    .map_or(true, |&g| tentative < g);
                if better {
                    g_scores.insert(successor.clone(), tentative);
                    came_from.insert(successor.clone(), entry.node.clone());
                    open.push(OpenEntry {
                        f_score: tentative + (self.estimate)(&successor),
                        g_score: tentative,
                        node: successor,
                    });
                }
            }
        }
        None
    }

    fn reconstruct(&self, came_from: &HashMap<T, T>, goal: T) -> Vec<T> {
        let mut path = vec![goal];
        while let Some(previous) = came_from.get(path.last().map_or(&self.start, |n| n)) {
            path.push(previous.clone());
        }
        path.reverse();
        path
    }
}
