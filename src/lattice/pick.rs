//! lattice::pick
//!
//! Resolve a click in view coordinates to a lattice node.
//!
//! The click first snaps to the nearest level (by y), clamped to the range of
//! known levels, then to the nearest vertex on that level (by x). On an exact
//! tie between two candidates the lower coordinate wins, so identical input
//! always yields the same node.

use super::graph::LatticeGraph;
use super::levels::LevelMap;
use crate::core::types::NodeId;

/// Nearest entry of an ascending `sorted` slice to `value`.
///
/// Values outside the slice clamp to its ends; ties resolve to the lower
/// entry; `NaN` resolves to the first entry. Returns `None` for an empty
/// slice.
///
/// # Example
///
/// ```
/// use assembly_lattice::lattice::pick::nearest_value;
///
/// let stops = [0.0, 1.0, 3.0];
/// assert_eq!(nearest_value(-5.0, &stops), Some(0.0));
/// assert_eq!(nearest_value(2.0, &stops), Some(1.0)); // tie -> lower
/// assert_eq!(nearest_value(2.1, &stops), Some(3.0));
/// assert_eq!(nearest_value(9.0, &stops), Some(3.0));
/// ```
pub fn nearest_value(value: f64, sorted: &[f64]) -> Option<f64> {
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    if value.is_nan() || value <= first {
        return Some(first);
    }
    if value >= last {
        return Some(last);
    }

    // first < value < last, so 1 <= upper <= len - 1
    let upper = sorted.partition_point(|v| *v <= value);
    let (lo, hi) = (sorted[upper - 1], sorted[upper]);
    if hi - value < value - lo {
        Some(hi)
    } else {
        Some(lo)
    }
}

/// The node nearest to `(x, y)`.
///
/// Returns `None` only for an empty graph.
pub fn nearest_node(click: (f64, f64), levels: &LevelMap, graph: &LatticeGraph) -> Option<NodeId> {
    let (x, y) = click;

    // (level y, level) for every populated level
    let mut level_ys: Vec<(f64, usize)> = levels
        .rows()
        .filter_map(|(level, row)| {
            let first = row.first()?;
            graph.vertex(*first).map(|v| (v.y, level))
        })
        .collect();
    level_ys.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ys: Vec<f64> = level_ys.iter().map(|(y, _)| *y).collect();
    let snapped_y = nearest_value(y, &ys)?;
    let level = level_ys
        .iter()
        .find(|(ly, _)| *ly == snapped_y)
        .map(|(_, l)| *l)?;

    let mut row: Vec<(f64, NodeId)> = levels
        .nodes_at(level)
        .iter()
        .filter_map(|id| graph.vertex(*id).map(|v| (v.x, *id)))
        .collect();
    row.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let xs: Vec<f64> = row.iter().map(|(x, _)| *x).collect();
    let snapped_x = nearest_value(x, &xs)?;
    row.iter().find(|(vx, _)| *vx == snapped_x).map(|(_, id)| *id)
}
