use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::{GraphError, Result};
use crate::graph::{NodeId, SegmentId, WallGraph};

/// A maximal run of wall segments through degree-2 nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Chain {
    pub segments: Vec<SegmentId>,
    /// `segments.len() + 1` nodes; first equals last when closed.
    pub nodes: Vec<NodeId>,
    pub closed: bool,
}

/// Wall-local adjacency: node to the wall's own segments at that node.
pub(super) type Adjacency = FxHashMap<NodeId, SmallVec<[SegmentId; 4]>>;

pub(super) fn adjacency(graph: &WallGraph, segments: &[SegmentId]) -> Result<Adjacency> {
    let mut adj = Adjacency::default();
    for s in segments {
        let seg = graph.segment(*s)?;
        adj.entry(seg.start).or_default().push(*s);
        adj.entry(seg.end).or_default().push(*s);
    }
    Ok(adj)
}

/// Splits the wall's segments into chains.
///
/// Open chains start and end at nodes where the wall does not continue in
/// exactly one direction; what remains afterwards are closed loops.
pub(super) fn build_chains(graph: &WallGraph, segments: &[SegmentId], adj: &Adjacency) -> Result<Vec<Chain>> {
    let degree = |n: NodeId| adj.get(&n).map_or(0, SmallVec::len);
    let mut visited = FxHashSet::default();
    let mut chains = Vec::new();

    for s in segments {
        if visited.contains(s) {
            continue;
        }
        let seg = graph.segment(*s)?;
        for from in [seg.start, seg.end] {
            if degree(from) != 2 && !visited.contains(s) {
                chains.push(walk(graph, adj, &mut visited, from, *s)?);
            }
        }
    }
    for s in segments {
        if !visited.contains(s) {
            let start = graph.segment(*s)?.start;
            chains.push(walk(graph, adj, &mut visited, start, *s)?);
        }
    }
    Ok(chains)
}

fn walk(
    graph: &WallGraph,
    adj: &Adjacency,
    visited: &mut FxHashSet<SegmentId>,
    start: NodeId,
    first: SegmentId,
) -> Result<Chain> {
    let mut nodes = vec![start];
    let mut segments = Vec::new();
    let mut node = start;
    let mut current = first;
    let mut closed = false;

    loop {
        visited.insert(current);
        segments.push(current);
        let next = graph
            .segment(current)?
            .other_node(node)
            .ok_or_else(|| GraphError::InvalidReference(format!("segment {current:?} does not touch {node:?}")))?;
        nodes.push(next);
        if next == start {
            closed = true;
            break;
        }
        let Some(arms) = adj.get(&next).filter(|a| a.len() == 2) else {
            break;
        };
        let Some(follow) = arms.iter().find(|a| !visited.contains(*a)) else {
            break;
        };
        node = next;
        current = *follow;
    }

    Ok(Chain {
        segments,
        nodes,
        closed,
    })
}
