use cgmath::{prelude::*, Vector2};
use physics::Body;

const FILLED: char = '#';
const EMPTY: char = ' ';
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// A drawing surface addressed in simulation units.
pub trait Screen {
    fn clear(&mut self);
    /// World point that maps to the middle of the surface.
    fn set_viewport_center(&mut self, x: f64, y: f64);
    fn plot_filled_circle(&mut self, x: f64, y: f64, radius: f64);
    fn present(&mut self) -> anyhow::Result<()>;
}

pub fn plot(body: &Body, screen: &mut (impl Screen + ?Sized)) {
    screen.plot_filled_circle(body.pos.x, body.pos.y, body.radius());
}

/// Character buffer rasterizing circles onto terminal cells.
#[derive(Debug, Clone)]
pub struct CharGrid {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    center: Vector2<f64>,
    view_radius: f64,
    units_per_col: f64,
}

impl CharGrid {
    /// `view_radius` is the world distance from the centre to the nearer
    /// edge of the grid.
    pub fn new(cols: usize, rows: usize, view_radius: f64) -> Self {
        let mut grid = Self {
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            center: Vector2::zero(),
            view_radius,
            units_per_col: 1.0,
        };
        grid.resize(cols, rows);
        grid
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![EMPTY; cols * rows];
        let half_width_cols = cols as f64 / 2.0;
        let half_height_cols = rows as f64 / 2.0 * CELL_ASPECT;
        let fit = half_width_cols.min(half_height_cols).max(1.0);
        self.units_per_col = self.view_radius / fit;
    }

    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }
    pub fn center(&self) -> Vector2<f64> {
        self.center
    }
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col] == FILLED
    }
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == FILLED).count()
    }
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().collect())
    }

    fn units_per_row(&self) -> f64 {
        self.units_per_col * CELL_ASPECT
    }
    /// Fractional cell coordinates of a world point.
    fn to_cell_space(&self, x: f64, y: f64) -> (f64, f64) {
        let col = (x - self.center.x) / self.units_per_col + self.cols as f64 / 2.0;
        let row = self.rows as f64 / 2.0 - (y - self.center.y) / self.units_per_row();
        (col, row)
    }
    fn cell_center(&self, col: usize, row: usize) -> Vector2<f64> {
        Vector2::new(
            self.center.x + (col as f64 + 0.5 - self.cols as f64 / 2.0) * self.units_per_col,
            self.center.y + (self.rows as f64 / 2.0 - row as f64 - 0.5) * self.units_per_row(),
        )
    }
    fn fill(&mut self, col: usize, row: usize) {
        self.cells[row * self.cols + col] = FILLED;
    }
}

/// Clamps a fractional cell range to `0..len`, `None` when it misses.
fn cell_range(lo: f64, hi: f64, len: usize) -> Option<(usize, usize)> {
    let (lo, hi) = (lo.floor(), hi.floor());
    if len == 0 || !(hi >= 0.0 && lo < len as f64) {
        return None;
    }
    Some((lo.max(0.0) as usize, (hi as usize).min(len - 1)))
}

impl Screen for CharGrid {
    fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
    fn set_viewport_center(&mut self, x: f64, y: f64) {
        self.center = Vector2::new(x, y);
    }
    fn plot_filled_circle(&mut self, x: f64, y: f64, radius: f64) {
        let (col_lo, row_lo) = self.to_cell_space(x - radius, y + radius);
        let (col_hi, row_hi) = self.to_cell_space(x + radius, y - radius);
        let (Some(cols), Some(rows)) = (
            cell_range(col_lo, col_hi, self.cols),
            cell_range(row_lo, row_hi, self.rows),
        ) else {
            return;
        };
        let mut any = false;
        for row in rows.0..=rows.1 {
            for col in cols.0..=cols.1 {
                if (self.cell_center(col, row) - Vector2::new(x, y)).magnitude2() <= radius * radius
                {
                    self.fill(col, row);
                    any = true;
                }
            }
        }
        if !any {
            // Smaller than a cell: mark the one holding the centre.
            let (col, row) = self.to_cell_space(x, y);
            if let (Some((col, _)), Some((row, _))) = (
                cell_range(col, col, self.cols),
                cell_range(row, row, self.rows),
            ) {
                self.fill(col, row);
            }
        }
    }
    fn present(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Clear,
    Center { x: f64, y: f64 },
    Circle { x: f64, y: f64, radius: f64 },
    Present,
}

/// Headless surface remembering every call made on it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Screen for Recorder {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }
    fn set_viewport_center(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::Center { x, y });
    }
    fn plot_filled_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.calls.push(DrawCall::Circle { x, y, radius });
    }
    fn present(&mut self) -> anyhow::Result<()> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }
}
