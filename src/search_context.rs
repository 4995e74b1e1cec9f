//! A* search whose frontier breaks ties on estimated cost by insertion order: among equal
//! estimates the entry pushed first is expanded first, so the result only depends on the order
//! in which successors are produced.
//!
//! Visited nodes live in an [IndexMap] together with their parent index and best known cost, and
//! a path is rebuilt by walking parent indices back to the start.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
    sequence: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.sequence == other.sequence
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // The heap is a max-heap: the smallest estimate and, among equal estimates, the earliest
        // pushed entry must compare greatest
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path: Vec<N> = std::iter::successors(Some(start), |&i| {
        parents.get_index(i).map(|(_, value)| parent(value))
    })
    .map_while(|i| parents.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Bookkeeping of a single search: the frontier, the visited nodes with their parent and best
/// cost, and the set of expanded nodes. A context is built per search and dropped afterwards.
pub struct SearchContext<N, C> {
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    parents: FxIndexMap<N, (usize, C)>,
    closed: FxHashSet<usize>,
    sequence: usize,
}

impl<N, C> Default for SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
{
    pub fn new() -> Self {
        SearchContext {
            to_see: BinaryHeap::new(),
            parents: FxIndexMap::default(),
            closed: FxHashSet::default(),
            sequence: 0,
        }
    }

    /// Number of nodes expanded by the last search.
    pub fn expanded(&self) -> usize {
        self.closed.len()
    }

    fn push(&mut self, estimated_cost: C, cost: C, index: usize) {
        self.to_see.push(SmallestCostHolder {
            estimated_cost,
            cost,
            index,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    /// Runs the search from `start` until `success` holds for an expanded node, returning the
    /// path to that node and its cost, or [None] once the frontier is exhausted.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.to_see.clear();
        self.parents.clear();
        self.closed.clear();
        self.sequence = 0;

        let h = heuristic(start);
        self.push(h, Zero::zero(), 0);
        self.parents
            .insert(start.clone(), (usize::MAX, Zero::zero()));
        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            let successors = {
                let (node, &(_, c)) = self.parents.get_index(index)?;
                // A node may be in the heap several times if a cheaper way to it was found
                // later; only the entry carrying the best cost is expanded.
                if cost > c {
                    continue;
                }
                if success(node) {
                    let path = reverse_path(&self.parents, |&(p, _)| p, index);
                    self.closed.insert(index);
                    debug!(
                        "Search finished after expanding {} nodes",
                        self.closed.len()
                    );
                    return Some((path, cost));
                }
                if !self.closed.insert(index) {
                    continue;
                }
                successors(node)
            };
            for (successor, move_cost) in successors {
                let new_cost = cost + move_cost;
                let h; // heuristic(&successor)
                let n; // index for successor
                match self.parents.entry(successor) {
                    Vacant(e) => {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    }
                    Occupied(mut e) => {
                        if e.get().1 > new_cost && !self.closed.contains(&e.index()) {
                            h = heuristic(e.key());
                            n = e.index();
                            e.insert((index, new_cost));
                        } else {
                            continue;
                        }
                    }
                }
                self.push(new_cost + h, new_cost, n);
            }
        }
        warn!(
            "Frontier exhausted after expanding {} nodes without reaching the goal",
            self.closed.len()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A line graph 0 - 1 - 2 - 3 with unit costs.
    fn line(n: &u32) -> Vec<(u32, u32)> {
        let mut succ = Vec::new();
        if *n > 0 {
            succ.push((n - 1, 1));
        }
        if *n < 3 {
            succ.push((n + 1, 1));
        }
        succ
    }

    #[test]
    fn finds_path_on_line() {
        let mut context: SearchContext<u32, u32> = SearchContext::new();
        let (path, cost) = context.astar(&0, line, |n| 3 - n, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3]);
        assert_eq!(cost, 3);
        assert_eq!(context.expanded(), 4);
    }

    #[test]
    fn start_is_goal() {
        let mut context: SearchContext<u32, u32> = SearchContext::new();
        let (path, cost) = context.astar(&2, line, |_| 0, |n| *n == 2).unwrap();
        assert_eq!(path, vec![2]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn exhausted_frontier() {
        let mut context: SearchContext<u32, u32> = SearchContext::new();
        assert!(context.astar(&0, line, |_| 0, |n| *n == 7).is_none());
        assert_eq!(context.expanded(), 4);
    }

    #[test]
    fn ties_go_to_first_inserted() {
        // Diamond 0 -> {1, 2} -> 3 with equal costs: the first listed branch wins.
        let diamond = |n: &u32| -> Vec<(u32, u32)> {
            match n {
                0 => vec![(2, 1), (1, 1)],
                1 | 2 => vec![(3, 1)],
                _ => vec![],
            }
        };
        let mut context: SearchContext<u32, u32> = SearchContext::new();
        let (path, _) = context.astar(&0, diamond, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 2, 3]);
    }

    #[test]
    fn cheaper_route_replaces_parent() {
        // 0 -> 1 costs 5, 0 -> 2 -> 1 costs 2
        let graph = |n: &u32| -> Vec<(u32, u32)> {
            match n {
                0 => vec![(1, 5), (2, 1)],
                2 => vec![(1, 1)],
                1 => vec![(3, 1)],
                _ => vec![],
            }
        };
        let mut context: SearchContext<u32, u32> = SearchContext::new();
        let (path, cost) = context.astar(&0, graph, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 2, 1, 3]);
        assert_eq!(cost, 3);
    }
}
