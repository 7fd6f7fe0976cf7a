use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use gridseek_core::Point;

use crate::node::{Node, preference};

// ---------------------------------------------------------------------------
// Heap entries
// ---------------------------------------------------------------------------

/// Heap entry for an open node. Entries are never updated in place: a
/// relaxed node gets a new entry and the old one goes stale (its `version`
/// no longer matches the slot).
#[derive(Debug)]
struct HeapEntry {
    node: Node,
    order: u64,
    version: u64,
    maximize: bool,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry: the preferred node, then the
        // one inserted first.
        preference(&self.node, &other.node, self.maximize)
            .reverse()
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Debug)]
struct Slot {
    node: Node,
    /// First-insertion rank, kept across relaxations.
    order: u64,
    version: u64,
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// The open set: discovered but unexpanded nodes, unique per position.
///
/// Pops follow [`Node::get_min`] over the nodes in first-insertion order:
/// lowest cost, then lowest heuristic, then earliest discovered (all flipped
/// except the last when `maximize` is set).
#[derive(Debug)]
pub struct Frontier {
    heap: BinaryHeap<HeapEntry>,
    slots: HashMap<Point, Slot>,
    next_order: u64,
    next_version: u64,
    maximize: bool,
}

impl Frontier {
    pub fn new(maximize: bool) -> Self {
        Self {
            heap: BinaryHeap::new(),
            slots: HashMap::new(),
            next_order: 0,
            next_version: 0,
            maximize,
        }
    }

    /// Number of open nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.slots.contains_key(&p)
    }

    /// The open node at `p`, if any.
    pub fn get(&self, p: Point) -> Option<&Node> {
        self.slots.get(&p).map(|s| &s.node)
    }

    /// Insert `node`, or replace the open node at the same position.
    ///
    /// Returns `true` if the position was not open before.
    pub fn push(&mut self, node: Node) -> bool {
        let version = self.next_version;
        self.next_version += 1;
        let (order, fresh) = match self.slots.entry(node.pos()) {
            Entry::Occupied(mut e) => {
                let slot = e.get_mut();
                slot.node = node;
                slot.version = version;
                (slot.order, false)
            }
            Entry::Vacant(e) => {
                let order = self.next_order;
                self.next_order += 1;
                e.insert(Slot { node, order, version });
                (order, true)
            }
        };
        self.heap.push(HeapEntry {
            node,
            order,
            version,
            maximize: self.maximize,
        });
        fresh
    }

    /// Remove and return the preferred open node.
    pub fn pop(&mut self) -> Option<Node> {
        while let Some(entry) = self.heap.pop() {
            let p = entry.node.pos();
            let live = self.slots.get(&p).is_some_and(|s| s.version == entry.version);
            if live {
                return self.slots.remove(&p).map(|s| s.node);
            }
        }
        None
    }

    /// Iterate over the open nodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.slots.values().map(|s| &s.node)
    }

    /// Drop every open node.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
        self.next_order = 0;
    }
}
