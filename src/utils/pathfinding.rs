//! A* pathfinding over the wall grid.
//!
//! 8-directional movement with corner-cutting prevention: a diagonal step is
//! only allowed when both adjacent cardinal cells are walkable, so enemies
//! never squeeze between two diagonal wall cells.

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::resources::path_grid::PathGrid;

/// Open-set entry, ordered so `BinaryHeap` pops the lowest f-score first.
#[derive(Clone, Copy, PartialEq)]
struct Node {
    pos: IVec2,
    priority: f32,
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a cell path from `start` to `goal`, both inclusive.
///
/// Returns `None` if either end is blocked or the goal is unreachable.
pub fn find_path(start: IVec2, goal: IVec2, grid: &PathGrid) -> Option<Vec<IVec2>> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![goal]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut g_score: HashMap<IVec2, f32> = HashMap::new();
    let mut closed: HashSet<IVec2> = HashSet::new();

    g_score.insert(start, 0.0);
    open_set.push(Node {
        pos: start,
        priority: octile_distance(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        if !closed.insert(current.pos) {
            continue;
        }

        let current_g = g_score[&current.pos];
        for neighbor in neighbors_8(current.pos, grid) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative = current_g + step_cost(current.pos, neighbor);
            if tentative < g_score.get(&neighbor).copied().unwrap_or(f32::INFINITY) {
                came_from.insert(neighbor, current.pos);
                g_score.insert(neighbor, tentative);
                open_set.push(Node {
                    pos: neighbor,
                    priority: tentative + octile_distance(neighbor, goal),
                });
            }
        }
    }

    None
}

/// Admissible heuristic for 8-way grids.
fn octile_distance(a: IVec2, b: IVec2) -> f32 {
    let d = (a - b).abs();
    let (lo, hi) = (d.x.min(d.y) as f32, d.x.max(d.y) as f32);
    hi + (std::f32::consts::SQRT_2 - 1.0) * lo
}

fn step_cost(a: IVec2, b: IVec2) -> f32 {
    if a.x != b.x && a.y != b.y {
        std::f32::consts::SQRT_2
    } else {
        1.0
    }
}

fn neighbors_8(pos: IVec2, grid: &PathGrid) -> Vec<IVec2> {
    let mut neighbors = Vec::with_capacity(8);

    let e = grid.is_walkable(pos + IVec2::X);
    let w = grid.is_walkable(pos - IVec2::X);
    let n = grid.is_walkable(pos + IVec2::Y);
    let s = grid.is_walkable(pos - IVec2::Y);

    if e { neighbors.push(pos + IVec2::X); }
    if w { neighbors.push(pos - IVec2::X); }
    if n { neighbors.push(pos + IVec2::Y); }
    if s { neighbors.push(pos - IVec2::Y); }

    let diagonals = [
        (IVec2::new(1, 1), n && e),
        (IVec2::new(-1, 1), n && w),
        (IVec2::new(1, -1), s && e),
        (IVec2::new(-1, -1), s && w),
    ];
    for (dir, cardinals_open) in diagonals {
        if cardinals_open && grid.is_walkable(pos + dir) {
            neighbors.push(pos + dir);
        }
    }

    neighbors
}

fn reconstruct_path(came_from: &HashMap<IVec2, IVec2>, mut current: IVec2) -> Vec<IVec2> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(cols: i32, rows: i32) -> PathGrid {
        PathGrid::with_blocked(cols, rows, &[])
    }

    #[test]
    fn test_straight_path() {
        let grid = open_grid(10, 5);
        let path = find_path(IVec2::new(0, 2), IVec2::new(9, 2), &grid).unwrap();
        assert_eq!(path.first(), Some(&IVec2::new(0, 2)));
        assert_eq!(path.last(), Some(&IVec2::new(9, 2)));
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_path_avoids_blocked_cells() {
        let blocked = [IVec2::new(4, 1), IVec2::new(4, 2), IVec2::new(4, 3)];
        let grid = PathGrid::with_blocked(10, 5, &blocked);
        let path = find_path(IVec2::new(0, 2), IVec2::new(9, 2), &grid).unwrap();
        for cell in &path {
            assert!(grid.is_walkable(*cell), "path crosses blocked cell {cell:?}");
        }
    }

    #[test]
    fn test_fully_blocked_column_has_no_path() {
        let blocked: Vec<IVec2> = (0..5).map(|y| IVec2::new(4, y)).collect();
        let grid = PathGrid::with_blocked(10, 5, &blocked);
        assert!(find_path(IVec2::new(0, 2), IVec2::new(9, 2), &grid).is_none());
    }

    #[test]
    fn test_blocked_goal() {
        let grid = PathGrid::with_blocked(10, 5, &[IVec2::new(9, 2)]);
        assert!(find_path(IVec2::new(0, 2), IVec2::new(9, 2), &grid).is_none());
    }

    #[test]
    fn test_corner_cutting_prevention() {
        let grid = PathGrid::with_blocked(10, 10, &[IVec2::new(5, 4), IVec2::new(4, 5)]);
        let neighbors = neighbors_8(IVec2::new(4, 4), &grid);
        assert!(!neighbors.contains(&IVec2::new(5, 5)));
        assert!(neighbors.contains(&IVec2::new(3, 3)));
    }

    #[test]
    fn test_diagonal_path_is_short() {
        let grid = open_grid(6, 6);
        let path = find_path(IVec2::new(0, 0), IVec2::new(5, 5), &grid).unwrap();
        assert_eq!(path.len(), 6);
    }
}
