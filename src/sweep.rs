// sweep.rs — 8SSEDT: four directional scanline passes over a Grid.
//
// Each pass visits every cell once, in a fixed scan order, and relaxes the
// cell against a small fixed set of neighbors that pass has already
// visited. The passes are grouped into two sweeps; within a sweep the two
// passes alternate row by row, so a row's second pass sees its first
// pass's writes, and the next row's first pass sees both:
//
//   Downward sweep (y = 0 .. h):
//     pass 1  DownRight   x: 0 → w-1    neighbors (-1,0) (-1,-1) (0,-1)
//     pass 2  DownLeft    x: w-1 → 0    neighbors (1,-1) (1,0)
//
//   Upward sweep (y = h-1 .. 0):
//     pass 3  UpLeft      x: w-1 → 0    neighbors (1,0) (1,1) (0,1)
//     pass 4  UpRight     x: 0 → w-1    neighbors (-1,1) (-1,0)
//
// After the upward sweep every cell holds its converged offset. This is a
// single relaxation per direction, not a fixed-point iteration: exactly
// the two sweeps run, and skipping one leaves distances unpropagated.
//
// RELAXATION RULE
// ───────────────
// A candidate offset is the neighbor's offset plus the absolute step to the
// neighbor. The cell takes the candidate only if its squared length is
// strictly smaller than the current one, so among equal distances the
// first offset found wins. Out-of-bounds neighbors are sentinels and are
// always skipped.
//
// How "seed" is defined depends on the propagation mode:
//
//   CrossClass       one grid, both classes. A neighbor of the other class
//                    is an implicit seed: the candidate restarts at the
//                    bare step. Same-class neighbors still unresolved are
//                    skipped.
//
//   SeededBy(class)  one grid of a FieldPair. Cells of `class` already hold
//                    their exact zero and are never refined; every other
//                    cell propagates from any resolved neighbor.
//
// The cross-class rule is an approximation: the boundary is inferred from
// class changes between neighbors, so both sides of an edge report
// distance 1 and no cell reports 0. The dual-field form (SeededBy on each
// grid) is the reference. See DESIGN.md.

use crate::grid::{Cell, CellClass, FieldPair, Grid, Offset};

/// How neighbor information propagates into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Boundary discovered lazily at class changes (single-field).
    CrossClass,
    /// Cells of this class are fixed zero seeds (one grid of a field pair).
    SeededBy(CellClass),
}

/// One directional scanline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    DownRight,
    DownLeft,
    UpLeft,
    UpRight,
}

impl Pass {
    /// All four passes, in sweep order.
    pub const ORDER: [Pass; 4] = [Pass::DownRight, Pass::DownLeft, Pass::UpLeft, Pass::UpRight];

    /// Neighbor offsets compared by this pass, in comparison order.
    pub const fn neighbors(self) -> &'static [(isize, isize)] {
        match self {
            Pass::DownRight => &[(-1, 0), (-1, -1), (0, -1)],
            Pass::DownLeft => &[(1, -1), (1, 0)],
            Pass::UpLeft => &[(1, 0), (1, 1), (0, 1)],
            Pass::UpRight => &[(-1, 1), (-1, 0)],
        }
    }

    /// Horizontal scan direction within a row.
    pub const fn left_to_right(self) -> bool {
        matches!(self, Pass::DownRight | Pass::UpRight)
    }
}

/// A vertical sweep pairing two passes per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Downward,
    Upward,
}

impl Sweep {
    pub const ORDER: [Sweep; 2] = [Sweep::Downward, Sweep::Upward];

    /// The two passes run on each row, first to last.
    pub const fn passes(self) -> [Pass; 2] {
        match self {
            Sweep::Downward => [Pass::DownRight, Pass::DownLeft],
            Sweep::Upward => [Pass::UpLeft, Pass::UpRight],
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Run the full transform (both sweeps) on one grid.
pub fn transform(grid: &mut Grid, rule: Propagation) {
    for sweep in Sweep::ORDER {
        run_sweep(grid, sweep, rule);
    }
}

/// Run the dual-field transform: each grid independently, seeded by its
/// own class.
pub fn transform_pair(pair: &mut FieldPair) {
    transform(&mut pair.to_object, Propagation::SeededBy(CellClass::Object));
    transform(&mut pair.to_empty, Propagation::SeededBy(CellClass::Empty));
}

/// Run one sweep: both of its passes, interleaved row by row.
pub fn run_sweep(grid: &mut Grid, sweep: Sweep, rule: Propagation) {
    let [first, second] = sweep.passes();
    let h = grid.height();
    match sweep {
        Sweep::Downward => {
            for y in 0..h {
                run_pass_row(grid, first, y, rule);
                run_pass_row(grid, second, y, rule);
            }
        }
        Sweep::Upward => {
            for y in (0..h).rev() {
                run_pass_row(grid, first, y, rule);
                run_pass_row(grid, second, y, rule);
            }
        }
    }
}

/// Run one pass over every row, in the vertical order of its sweep,
/// without interleaving the sweep's other pass.
pub fn run_pass(grid: &mut Grid, pass: Pass, rule: Propagation) {
    let h = grid.height();
    match pass {
        Pass::DownRight | Pass::DownLeft => {
            for y in 0..h {
                run_pass_row(grid, pass, y, rule);
            }
        }
        Pass::UpLeft | Pass::UpRight => {
            for y in (0..h).rev() {
                run_pass_row(grid, pass, y, rule);
            }
        }
    }
}

/// Run a single pass over one row, in the pass's horizontal direction.
///
/// # Panics
/// Panics if `y >= grid.height()`.
pub fn run_pass_row(grid: &mut Grid, pass: Pass, y: usize, rule: Propagation) {
    assert!(y < grid.height(), "row {y} out of bounds (height {})", grid.height());
    let neighbors = pass.neighbors();
    let w = grid.width();
    if pass.left_to_right() {
        for x in 0..w {
            relax(grid, x, y, neighbors, rule);
        }
    } else {
        for x in (0..w).rev() {
            relax(grid, x, y, neighbors, rule);
        }
    }
}

// ---------------------------------------------------------------------------
// Relaxation
// ---------------------------------------------------------------------------

/// Compare the cell at (x, y) against each neighbor in turn, keeping the
/// best candidate. Later comparisons see the improvements of earlier ones.
#[inline]
fn relax(grid: &mut Grid, x: usize, y: usize, neighbors: &[(isize, isize)], rule: Propagation) {
    let mut cell = grid.cell(x, y);

    if let Propagation::SeededBy(seed) = rule {
        if cell.class() == seed {
            return;
        }
    }

    let mut improved = false;
    for &(ox, oy) in neighbors {
        let neighbor = grid.sample(x as isize + ox, y as isize + oy);
        let Some(offset) = candidate(&cell, &neighbor, Offset::step(ox, oy), rule) else {
            continue;
        };
        // Strictly less: ties keep the offset found first.
        if offset.sqr_len() < cell.sqr_distance() {
            cell = Cell::with_offset(cell.class(), offset);
            improved = true;
        }
    }

    if improved {
        grid.set(x, y, cell);
    }
}

/// Candidate offset through `neighbor`, or `None` if the neighbor carries
/// no usable information.
#[inline]
fn candidate(cell: &Cell, neighbor: &Cell, step: Offset, rule: Propagation) -> Option<Offset> {
    if neighbor.class() == CellClass::OutOfBounds {
        return None;
    }
    match rule {
        Propagation::CrossClass => {
            if neighbor.class() != cell.class() {
                Some(step)
            } else if neighbor.is_resolved() {
                Some(neighbor.offset() + step)
            } else {
                None
            }
        }
        Propagation::SeededBy(_) => neighbor.is_resolved().then(|| neighbor.offset() + step),
    }
}
