//! The search [`Node`]: one grid cell with its cost state and parent link.

use std::cmp::Ordering;
use std::fmt;

use gridseek_core::Point;

use crate::config::{Mode, SearchContext};
use crate::cost::Cost;
use crate::neighbors::Neighbors;

/// A grid cell during search.
///
/// Identity is the position alone: two nodes compare equal when they sit on
/// the same cell, whatever their costs or parents. The parent is stored as a
/// position and resolved through the closed set when backtracking.
#[derive(Copy, Clone, Debug)]
pub struct Node {
    pos: Point,
    h_cost: Cost,
    g_cost: Cost,
    cost: Cost,
    parent: Option<Point>,
}

impl Node {
    /// Create a node at `pos`, parented to `parent` if given.
    pub fn new(ctx: &SearchContext, pos: Point, parent: Option<&Node>) -> Self {
        let h_cost = match ctx.mode {
            Mode::UniformCost => Cost::ZERO,
            Mode::GreedyBestFirst | Mode::AStar => ctx.metric.estimate(pos, ctx.end),
        };
        let mut node = Self {
            pos,
            h_cost,
            g_cost: Cost::ZERO,
            cost: h_cost,
            parent: None,
        };
        node.set_parent(ctx, parent);
        node
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Heuristic estimate to End.
    #[inline]
    pub fn h_cost(&self) -> Cost {
        self.h_cost
    }

    /// Accumulated cost from Start.
    #[inline]
    pub fn g_cost(&self) -> Cost {
        self.g_cost
    }

    /// `h_cost + g_cost`, the open-set ordering key.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn parent(&self) -> Option<Point> {
        self.parent
    }

    /// Re-parent the node and recompute its accumulated cost.
    pub fn set_parent(&mut self, ctx: &SearchContext, parent: Option<&Node>) {
        self.parent = parent.map(Node::pos);
        self.g_cost = match parent {
            Some(p) => self.g_through(ctx, p),
            None => Cost::ZERO,
        };
        self.cost = self.h_cost + self.g_cost;
    }

    /// The cost this node would have if `parent` were its parent.
    pub fn f_cost(&self, ctx: &SearchContext, parent: &Node) -> Cost {
        self.h_cost + self.g_through(ctx, parent)
    }

    fn g_through(&self, ctx: &SearchContext, parent: &Node) -> Cost {
        match ctx.mode {
            Mode::GreedyBestFirst => Cost::ZERO,
            Mode::UniformCost | Mode::AStar => {
                ctx.metric.step_cost(parent.pos, self.pos) + parent.g_cost
            }
        }
    }

    /// Freshly built nodes for every adjacent cell, each parented to `self`.
    ///
    /// Manhattan yields the 4 cardinal cells, the other metrics all 8. The
    /// iterator is lazy and unfiltered; call again for a fresh sequence.
    pub fn neighbors<'a>(&'a self, ctx: &'a SearchContext) -> impl Iterator<Item = Node> + 'a {
        Neighbors::new(self.pos, ctx.metric.allows_diagonals())
            .map(move |p| Node::new(ctx, p, Some(self)))
    }

    /// Pick the node with the lowest `cost` (highest when `maximize`).
    /// Equal costs prefer the lower `h_cost` (higher when `maximize`); on a
    /// full tie the earliest node wins.
    pub fn get_min<'a, I>(nodes: I, maximize: bool) -> Option<&'a Node>
    where
        I: IntoIterator<Item = &'a Node>,
    {
        nodes.into_iter().fold(None, |best, node| match best {
            Some(b) if preference(node, b, maximize) != Ordering::Less => Some(b),
            _ => Some(node),
        })
    }

    /// Total cost of a backtracked path, ordered End to Start.
    ///
    /// Outside greedy mode the End node already carries the accumulated
    /// cost. Greedy nodes never accumulate, so the path is re-walked step
    /// by step.
    pub fn path_cost(ctx: &SearchContext, path: &[Node]) -> Cost {
        match ctx.mode {
            Mode::UniformCost | Mode::AStar => path.first().map_or(Cost::ZERO, Node::cost),
            Mode::GreedyBestFirst => path
                .windows(2)
                .map(|w| ctx.metric.step_cost(w[1].pos, w[0].pos))
                .sum(),
        }
    }
}

/// Selection order between two nodes: `Less` means `a` is expanded before
/// `b`. `maximize` flips both the cost and the heuristic comparison.
pub(crate) fn preference(a: &Node, b: &Node, maximize: bool) -> Ordering {
    let ord = a.cost.cmp(&b.cost).then(a.h_cost.cmp(&b.h_cost));
    if maximize { ord.reverse() } else { ord }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Node {}

impl PartialEq<Point> for Node {
    fn eq(&self, other: &Point) -> bool {
        self.pos == *other
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.cost, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Metric;

    fn ctx(mode: Mode, metric: Metric) -> SearchContext {
        SearchContext::new(Some(Point::ZERO), mode, metric).unwrap()
    }

    #[test]
    fn heuristic_per_metric() {
        let p = Point::new(3, 1);
        let h = |metric| Node::new(&ctx(Mode::AStar, metric), p, None).h_cost();
        assert_eq!(h(Metric::Manhattan), Cost::from_tenths(40));
        assert_eq!(h(Metric::Octile), Cost::from_tenths(34));
        assert_eq!(h(Metric::Chebyshev), Cost::from_tenths(30));
    }

    #[test]
    fn uniform_cost_has_no_heuristic() {
        let c = ctx(Mode::UniformCost, Metric::Octile);
        let n = Node::new(&c, Point::new(5, 2), None);
        assert_eq!(n.h_cost(), Cost::ZERO);
        assert_eq!(n.cost(), Cost::ZERO);
    }

    #[test]
    fn set_parent_accumulates_step_costs() {
        let c = ctx(Mode::AStar, Metric::Octile);
        let a = Node::new(&c, Point::new(4, 4), None);
        let b = Node::new(&c, Point::new(3, 3), Some(&a));
        let d = Node::new(&c, Point::new(3, 2), Some(&b));
        assert_eq!(b.g_cost(), Cost::DIAGONAL);
        assert_eq!(d.g_cost(), Cost::DIAGONAL + Cost::STRAIGHT);
        assert_eq!(d.cost(), d.h_cost() + d.g_cost());
        assert_eq!(d.parent(), Some(Point::new(3, 3)));

        let c = ctx(Mode::AStar, Metric::Chebyshev);
        let a = Node::new(&c, Point::new(4, 4), None);
        let b = Node::new(&c, Point::new(3, 3), Some(&a));
        assert_eq!(b.g_cost(), Cost::STRAIGHT);
    }

    #[test]
    fn greedy_never_accumulates() {
        let c = ctx(Mode::GreedyBestFirst, Metric::Manhattan);
        let a = Node::new(&c, Point::new(4, 0), None);
        let b = Node::new(&c, Point::new(3, 0), Some(&a));
        assert_eq!(b.g_cost(), Cost::ZERO);
        assert_eq!(b.cost(), b.h_cost());
        assert_eq!(b.parent(), Some(Point::new(4, 0)));
    }

    #[test]
    fn clearing_parent_resets_g() {
        let c = ctx(Mode::AStar, Metric::Manhattan);
        let a = Node::new(&c, Point::new(2, 0), None);
        let mut b = Node::new(&c, Point::new(1, 0), Some(&a));
        b.set_parent(&c, None);
        assert_eq!(b.g_cost(), Cost::ZERO);
        assert_eq!(b.parent(), None);
    }

    #[test]
    fn f_cost_probes_without_mutating() {
        let c = ctx(Mode::AStar, Metric::Octile);
        let far = Node::new(&c, Point::new(6, 6), None);
        let near = Node::new(&c, Point::new(5, 6), Some(&far));
        let n = Node::new(&c, Point::new(4, 5), Some(&near));
        let alt = Node::new(&c, Point::new(5, 5), None);
        let probe = n.f_cost(&c, &alt);
        assert_eq!(probe, n.h_cost() + Cost::STRAIGHT);
        assert!(probe < n.cost());
        assert_eq!(n.parent(), Some(Point::new(5, 6)));
    }

    #[test]
    fn neighbors_follow_metric() {
        let c = ctx(Mode::AStar, Metric::Manhattan);
        let n = Node::new(&c, Point::new(2, 2), None);
        assert_eq!(n.neighbors(&c).count(), 4);
        assert!(n.neighbors(&c).all(|m| m.parent() == Some(n.pos())));

        let c = ctx(Mode::AStar, Metric::Chebyshev);
        let n = Node::new(&c, Point::new(2, 2), None);
        assert_eq!(n.neighbors(&c).count(), 8);
        assert!(n.neighbors(&c).all(|m| m.g_cost() == Cost::STRAIGHT));
    }

    #[test]
    fn equality_is_positional() {
        let c = ctx(Mode::AStar, Metric::Octile);
        let a = Node::new(&c, Point::new(1, 1), None);
        let parent = Node::new(&c, Point::new(2, 2), None);
        let b = Node::new(&c, Point::new(1, 1), Some(&parent));
        assert_ne!(a.cost(), b.cost());
        assert_eq!(a, b);
        assert_eq!(a, Point::new(1, 1));
        assert_ne!(a, Point::new(1, 2));
    }

    #[test]
    fn get_min_breaks_ties_on_heuristic() {
        let c = ctx(Mode::AStar, Metric::Manhattan);
        // Same total cost (4), different split between g and h.
        let root = Node::new(&c, Point::new(0, 2), None);
        let low_h = Node::new(&c, Point::new(0, 1), Some(&root)); // h 1, g 1
        let high_h = Node::new(&c, Point::new(2, 0), None); // h 2, g 0
        let far = Node::new(&c, Point::new(3, 3), None); // h 6
        assert_eq!(low_h.cost(), Cost::from_tenths(20));
        assert_eq!(high_h.cost(), Cost::from_tenths(20));

        let nodes = [high_h, far, low_h];
        assert_eq!(Node::get_min(&nodes, false).unwrap().pos(), Point::new(0, 1));
        assert_eq!(Node::get_min(&nodes, true).unwrap().pos(), Point::new(3, 3));

        // Maximizing flips the tie-break as well.
        let nodes = [low_h, high_h];
        assert_eq!(Node::get_min(&nodes, true).unwrap().pos(), Point::new(2, 0));
    }

    #[test]
    fn get_min_full_tie_keeps_first() {
        let c = ctx(Mode::AStar, Metric::Manhattan);
        let a = Node::new(&c, Point::new(1, 0), None);
        let b = Node::new(&c, Point::new(0, 1), None);
        assert_eq!(Node::get_min(&[a, b], false).unwrap().pos(), Point::new(1, 0));
        assert_eq!(Node::get_min(&[b, a], true).unwrap().pos(), Point::new(0, 1));
        let none: [Node; 0] = [];
        assert!(Node::get_min(&none, false).is_none());
    }

    #[test]
    fn path_cost_uses_destination_outside_greedy() {
        let c = ctx(Mode::AStar, Metric::Octile);
        let s = Node::new(&c, Point::new(2, 2), None);
        let m = Node::new(&c, Point::new(1, 1), Some(&s));
        let e = Node::new(&c, Point::ZERO, Some(&m));
        assert_eq!(Node::path_cost(&c, &[e, m, s]), Cost::DIAGONAL * 2);
        assert_eq!(Node::path_cost(&c, &[]), Cost::ZERO);
    }

    #[test]
    fn path_cost_rewalks_greedy_paths() {
        let c = ctx(Mode::GreedyBestFirst, Metric::Octile);
        let s = Node::new(&c, Point::new(2, 3), None);
        let a = Node::new(&c, Point::new(2, 2), Some(&s));
        let b = Node::new(&c, Point::new(1, 1), Some(&a));
        let e = Node::new(&c, Point::ZERO, Some(&b));
        let cost = Node::path_cost(&c, &[e, b, a, s]);
        assert_eq!(cost, Cost::STRAIGHT + Cost::DIAGONAL * 2);
        assert_eq!(cost.to_string(), "3.8");
    }
}
