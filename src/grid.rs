// grid.rs — Per-pixel transform state for the 8SSEDT sweep.
//
// A `Grid` is the working buffer the sweep mutates in place. Each `Cell`
// records which class its pixel belongs to and the offset `(dx, dy)` to
// the nearest seed found so far. The squared distance is derived from the
// offset at construction time and is never written independently:
//
//   Cell::with_offset(class, (dx, dy))  →  sqr_distance = dx² + dy²
//
// The only cells whose squared distance is not `dx² + dy²` are unresolved
// ones (sqr_distance == UNRESOLVED), which carry a zero offset.
//
// OUT-OF-BOUNDS READS
// ───────────────────
// `Grid::sample` takes signed coordinates and returns a fresh sentinel
// cell (class `OutOfBounds`, unresolved) for anything outside the grid.
// The sweep reads neighbors at `(x ± 1, y ± 1)` without special-casing
// the edges; the sentinel is always skipped by the propagation rules.
// The sentinel is constructed by value on every call, so there is no
// shared instance that a write could corrupt.

use std::fmt;
use std::ops::Add;

/// Squared-distance sentinel for "no seed reached this cell yet".
///
/// A quarter of `u32::MAX`: far above any in-grid squared distance once
/// the overflow guard in seed.rs has accepted the dimensions, and far
/// enough below the type's maximum that adding a neighbor step to an
/// in-range offset cannot wrap.
pub const UNRESOLVED: u32 = u32::MAX / 4;

/// Pixel class tracked by a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// Part of the shape (mask pixel set).
    Object,
    /// Background (mask pixel clear).
    Empty,
    /// Read-time sentinel for coordinates outside the grid. Never stored.
    OutOfBounds,
}

impl CellClass {
    /// The class on the other side of a boundary.
    ///
    /// `OutOfBounds` has no opposite and maps to itself.
    pub fn opposite(self) -> Self {
        match self {
            CellClass::Object => CellClass::Empty,
            CellClass::Empty => CellClass::Object,
            CellClass::OutOfBounds => CellClass::OutOfBounds,
        }
    }
}

/// Displacement from a cell to its nearest seed, in absolute pixel steps.
///
/// Components are unsigned: every sweep step adds `|ox|, |oy|`, so the
/// sign of the displacement is never needed to derive the distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Offset {
    pub dx: u32,
    pub dy: u32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub const fn new(dx: u32, dy: u32) -> Self {
        Offset { dx, dy }
    }

    /// The absolute step for a signed neighbor offset.
    pub const fn step(ox: isize, oy: isize) -> Self {
        Offset {
            dx: ox.unsigned_abs() as u32,
            dy: oy.unsigned_abs() as u32,
        }
    }

    /// Squared length: the offset dotted with itself.
    #[inline]
    pub const fn sqr_len(self) -> u32 {
        self.dx * self.dx + self.dy * self.dy
    }
}

impl Add for Offset {
    type Output = Offset;

    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One grid entry. Fields are private so the
/// `sqr_distance == offset.sqr_len()` invariant cannot be broken from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    class: CellClass,
    offset: Offset,
    sqr_distance: u32,
}

impl Cell {
    /// A cell with no seed found yet.
    #[inline]
    pub const fn unresolved(class: CellClass) -> Self {
        Cell { class, offset: Offset::ZERO, sqr_distance: UNRESOLVED }
    }

    /// A zero-distance seed.
    #[inline]
    pub const fn seed(class: CellClass) -> Self {
        Cell { class, offset: Offset::ZERO, sqr_distance: 0 }
    }

    /// A resolved cell whose distance is derived from `offset`.
    #[inline]
    pub const fn with_offset(class: CellClass, offset: Offset) -> Self {
        Cell { class, offset, sqr_distance: offset.sqr_len() }
    }

    /// The sentinel returned for every out-of-bounds read.
    #[inline]
    pub const fn out_of_bounds() -> Self {
        Cell::unresolved(CellClass::OutOfBounds)
    }

    #[inline]
    pub fn class(&self) -> CellClass {
        self.class
    }

    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    #[inline]
    pub fn sqr_distance(&self) -> u32 {
        self.sqr_distance
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.sqr_distance < UNRESOLVED
    }

    /// Euclidean distance in pixels, or `None` while unresolved.
    pub fn distance(&self) -> Option<f32> {
        self.is_resolved().then(|| (self.sqr_distance as f32).sqrt())
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Fixed-size, row-major 2D array of cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Allocate a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: Cell) -> Self {
        Grid { cells: vec![fill; width * height], width, height }
    }

    /// Build a grid by evaluating `f(x, y)` per cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Grid { cells, width, height }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at (x, y).
    ///
    /// # Panics
    /// Panics if (x, y) is outside the grid. Use [`Grid::sample`] for
    /// reads that may fall off the edge.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({x},{y}) out of bounds for grid {}×{}",
            self.width,
            self.height,
        );
        self.cells[y * self.width + x]
    }

    /// Bounds-safe read: outside the grid yields [`Cell::out_of_bounds`].
    #[inline]
    pub fn sample(&self, x: isize, y: isize) -> Cell {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Cell::out_of_bounds();
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert_ne!(cell.class, CellClass::OutOfBounds, "sentinel stored at ({x},{y})");
        self.cells[y * self.width + x] = cell;
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i % w, i / w, c))
    }

    /// Number of cells still holding the unresolved sentinel.
    pub fn unresolved_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_resolved()).count()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{ {}×{} }}", self.width, self.height)?;
        for y in 0..self.height.min(8) {
            write!(f, "  row {y}: [")?;
            for x in 0..self.width.min(12) {
                if x > 0 {
                    write!(f, ", ")?;
                }
                let c = self.cell(x, y);
                let tag = match c.class {
                    CellClass::Object => 'O',
                    CellClass::Empty => '.',
                    CellClass::OutOfBounds => '?',
                };
                if c.is_resolved() {
                    write!(f, "{tag}{}", c.sqr_distance)?;
                } else {
                    write!(f, "{tag}∞")?;
                }
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FieldPair
// ---------------------------------------------------------------------------

/// The two grids of the dual-field transform.
///
/// `to_object` is seeded with zeros at object pixels and converges to each
/// empty pixel's distance to the shape. `to_empty` is seeded at empty
/// pixels and converges to each object pixel's distance to the background.
/// The signed field is `d(to_object) − d(to_empty)`: positive outside,
/// negative inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub to_object: Grid,
    pub to_empty: Grid,
}

impl FieldPair {
    #[inline]
    pub fn width(&self) -> usize {
        self.to_object.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.to_object.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_offset_derives_distance() {
        let c = Cell::with_offset(CellClass::Empty, Offset::new(3, 4));
        assert_eq!(c.sqr_distance(), 25);
        assert_eq!(c.distance(), Some(5.0));
    }

    #[test]
    fn test_unresolved_has_no_distance() {
        let c = Cell::unresolved(CellClass::Object);
        assert!(!c.is_resolved());
        assert_eq!(c.distance(), None);
        assert_eq!(c.offset(), Offset::ZERO);
    }

    #[test]
    fn test_sample_out_of_bounds_returns_sentinel() {
        let grid = Grid::new(3, 2, Cell::seed(CellClass::Object));
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (-5, 9)] {
            let c = grid.sample(x, y);
            assert_eq!(c.class(), CellClass::OutOfBounds, "({x},{y})");
            assert!(!c.is_resolved());
        }
        assert_eq!(grid.sample(2, 1), Cell::seed(CellClass::Object));
    }

    #[test]
    fn test_step_takes_absolute_values() {
        assert_eq!(Offset::step(-1, 1), Offset::new(1, 1));
        assert_eq!(Offset::step(0, -1), Offset::new(0, 1));
        assert_eq!(Offset::new(2, 1) + Offset::step(-1, 0), Offset::new(3, 1));
    }

    #[test]
    fn test_opposite_class() {
        assert_eq!(CellClass::Object.opposite(), CellClass::Empty);
        assert_eq!(CellClass::Empty.opposite(), CellClass::Object);
        assert_eq!(CellClass::OutOfBounds.opposite(), CellClass::OutOfBounds);
    }

    #[test]
    fn test_unresolved_count() {
        let mut grid = Grid::new(2, 2, Cell::unresolved(CellClass::Empty));
        grid.set(1, 1, Cell::seed(CellClass::Object));
        assert_eq!(grid.unresolved_count(), 3);
    }
}
