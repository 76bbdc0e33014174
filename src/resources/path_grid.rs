//! Walkability grid over the play area, rebuilt from wall placements.

use bevy::prelude::*;

use crate::components::{Placement, PlacementKind};
use crate::resources::play_area::PlayArea;
use crate::utils::geometry::point_in_quad;
use crate::utils::pathfinding::find_path;

/// Upper bound on cells along either axis of a rebuilt grid.
pub const MAX_CELLS_PER_AXIS: i32 = 512;

/// Grid of cells over the play area plus the current enemy route.
///
/// Cells are addressed as `IVec2` with `x` growing right and `y` growing
/// down, like image pixels. Enemies enter at the middle of the left edge and
/// leave at the middle of the right edge.
#[derive(Resource, Debug, Clone)]
pub struct PathGrid {
    origin: Vec2,
    cell_size: f32,
    cols: i32,
    rows: i32,
    blocked: Vec<bool>,
    route: Vec<IVec2>,
    /// Bumped whenever the layout or the route changes.
    version: u64,
}

impl Default for PathGrid {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            cell_size: 1.0,
            cols: 0,
            rows: 0,
            blocked: Vec::new(),
            route: Vec::new(),
            version: 0,
        }
    }
}

impl PathGrid {
    /// Unit-sized grid with the given cells blocked. Route is computed.
    pub fn with_blocked(cols: i32, rows: i32, blocked_cells: &[IVec2]) -> Self {
        let mut grid = Self {
            cols,
            rows,
            blocked: vec![false; cols.max(0) as usize * rows.max(0) as usize],
            ..default()
        };
        for cell in blocked_cells {
            if let Some(index) = grid.index(*cell) {
                grid.blocked[index] = true;
            }
        }
        grid.route = find_path(grid.start(), grid.goal(), &grid).unwrap_or_default();
        grid
    }

    /// Re-lays the grid over `area` and blocks every cell covered by a wall.
    ///
    /// Calibration placements never block. Cells are widened past
    /// `cell_size` when the area would need more than `MAX_CELLS_PER_AXIS`
    /// along an axis. Returns true when the blocked layout changed, in
    /// which case the route is recomputed.
    pub fn rebuild<'a>(
        &mut self,
        area: &PlayArea,
        cell_size: f32,
        walls: impl IntoIterator<Item = &'a Placement>,
    ) -> bool {
        let size = area.bounds.size();
        let cell_size = cell_size
            .max(1.0)
            .max(size.max_element() / MAX_CELLS_PER_AXIS as f32);
        let cols = ((size.x / cell_size).floor() as i32).clamp(1, MAX_CELLS_PER_AXIS);
        let rows = ((size.y / cell_size).floor() as i32).clamp(1, MAX_CELLS_PER_AXIS);

        let mut next = Self {
            origin: area.bounds.min,
            cell_size,
            cols,
            rows,
            blocked: vec![false; cols as usize * rows as usize],
            route: Vec::new(),
            version: self.version,
        };

        for wall in walls.into_iter().filter(|p| p.kind == PlacementKind::Wall) {
            next.block_quad(&wall.corners, wall.center);
        }

        let changed = next.origin != self.origin
            || next.cell_size != self.cell_size
            || next.cols != self.cols
            || next.rows != self.rows
            || next.blocked != self.blocked;
        if !changed {
            return false;
        }

        next.route = find_path(next.start(), next.goal(), &next).unwrap_or_default();
        if next.route.is_empty() {
            warn!("Walls block every route from entry to exit");
        }
        next.version += 1;
        *self = next;
        true
    }

    fn block_quad(&mut self, corners: &[Vec2; 4], center: Vec2) {
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }

        let lo = self.cell_of(min);
        let hi = self.cell_of(max);
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let cell = IVec2::new(x, y);
                if point_in_quad(self.cell_center(cell), corners) {
                    self.set_blocked(cell);
                }
            }
        }

        // Small walls may not cover any cell center.
        if self.in_bounds(self.raw_cell_of(center)) {
            self.set_blocked(self.raw_cell_of(center));
        }
    }

    fn set_blocked(&mut self, cell: IVec2) {
        if let Some(index) = self.index(cell) {
            self.blocked[index] = true;
        }
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.cols + cell.x) as usize)
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| !self.blocked[i])
    }

    pub fn is_blocked(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.blocked[i])
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Center of a cell in image pixels.
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    fn raw_cell_of(&self, point: Vec2) -> IVec2 {
        ((point - self.origin) / self.cell_size).floor().as_ivec2()
    }

    /// Cell containing `point`, clamped to the grid.
    pub fn cell_of(&self, point: Vec2) -> IVec2 {
        self.raw_cell_of(point)
            .clamp(IVec2::ZERO, IVec2::new(self.cols - 1, self.rows - 1).max(IVec2::ZERO))
    }

    pub fn start(&self) -> IVec2 {
        IVec2::new(0, self.rows / 2)
    }

    pub fn goal(&self) -> IVec2 {
        IVec2::new(self.cols - 1, self.rows / 2)
    }

    /// Current entry-to-exit route, empty when walls block every path.
    pub fn route(&self) -> &[IVec2] {
        &self.route
    }

    /// Waypoints in image pixels from `point` to the exit.
    ///
    /// Walks straight to the exit when no route exists, so enemies never get
    /// stuck behind a sealed wall line.
    pub fn waypoints_from(&self, point: Vec2) -> Vec<Vec2> {
        let start = self.cell_of(point);
        match find_path(start, self.goal(), self) {
            Some(cells) => cells.into_iter().map(|c| self.cell_center(c)).collect(),
            None => vec![self.cell_center(self.goal())],
        }
    }
}
