use rand::Rng;

/// Wall/open grid carved by a randomized depth-first backtracker.
///
/// `true` cells are walls. The grid is immutable once generated: the
/// simulation and the renderer only ever read it, and a resize builds a
/// fresh `Maze` instead of patching this one.
#[derive(Debug, Clone)]
pub struct Maze {
    cols: usize,
    rows: usize,
    cell_size: f32,
    grid: Vec<bool>,
}

/// Carving moves two cells at a time; the skipped cell becomes the doorway.
const CARVE_DIRECTIONS: [(i64, i64); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

impl Maze {
    /// Build a maze covering `width` x `height` pixels at `cell_size`
    /// pixels per cell. Fractional trailing space is left uncovered and
    /// reported as wall by [`Maze::is_wall`].
    pub fn generate(width: f32, height: f32, cell_size: f32, rng: &mut impl Rng) -> Self {
        debug_assert!(cell_size > 0.0);
        let cols = (width / cell_size).max(0.0) as usize;
        let rows = (height / cell_size).max(0.0) as usize;
        let mut maze = Self {
            cols,
            rows,
            cell_size,
            grid: vec![true; cols * rows],
        };
        maze.carve(rng);
        maze
    }

    /// Iterative backtracker over the odd lattice. Grids thinner than two
    /// cells in either direction have no start cell and stay fully walled;
    /// grids below 3x3 end up with the start cell only.
    fn carve(&mut self, rng: &mut impl Rng) {
        if self.cols < 2 || self.rows < 2 {
            return;
        }

        let start_idx = self.idx(1, 1);
        self.grid[start_idx] = false;
        let mut stack = vec![(1usize, 1usize)];

        while let Some(&(cx, cy)) = stack.last() {
            // Unvisited cells two steps away, strictly inside the border.
            let mut candidates = [(0usize, 0usize); 4];
            let mut n = 0;
            for (dx, dy) in CARVE_DIRECTIONS {
                let nx = cx as i64 + dx;
                let ny = cy as i64 + dy;
                if nx > 0
                    && (nx as usize) < self.cols - 1
                    && ny > 0
                    && (ny as usize) < self.rows - 1
                    && self.grid[self.idx(nx as usize, ny as usize)]
                {
                    candidates[n] = (nx as usize, ny as usize);
                    n += 1;
                }
            }

            if n == 0 {
                stack.pop();
                continue;
            }

            let (nx, ny) = candidates[rng.gen_range(0..n)];
            let doorway = self.idx((cx + nx) / 2, (cy + ny) / 2);
            let next = self.idx(nx, ny);
            self.grid[doorway] = false;
            self.grid[next] = false;
            stack.push((nx, ny));
        }
    }

    /// Wall query for continuous pixel coordinates. Anything outside the
    /// grid's footprint counts as wall, so particles can never leave it.
    pub fn is_wall(&self, x: f32, y: f32) -> bool {
        if x < 0.0 || y < 0.0 {
            return true;
        }
        let col = (x / self.cell_size) as usize;
        let row = (y / self.cell_size) as usize;
        if col >= self.cols || row >= self.rows {
            return true;
        }
        self.grid[row * self.cols + col]
    }

    /// Cell-level wall query; out-of-range cells count as wall.
    pub fn is_wall_cell(&self, col: usize, row: usize) -> bool {
        if col >= self.cols || row >= self.rows {
            return true;
        }
        self.grid[row * self.cols + col]
    }

    pub fn has_open_cell(&self) -> bool {
        self.grid.iter().any(|wall| !wall)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel extent actually covered by grid cells.
    pub fn pixel_width(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }
}
