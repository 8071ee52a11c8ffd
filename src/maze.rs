//! Perfect maze generation with a randomized backtracker.

use rand::Rng;

/// Source of uniform integers in `[0, n)`.
pub trait UniformSource {
    fn below(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn below(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Up,
    Left,
    Down,
    Right,
}

impl Dir {
    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Left => (0, -1),
            Dir::Down => (1, 0),
            Dir::Right => (0, 1),
        }
    }
}

/// In-place Fisher-Yates shuffle driven by `rng`.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl UniformSource) {
    let mut counter = items.len();
    while counter > 0 {
        let index = rng.below(counter);
        counter -= 1;
        items.swap(counter, index);
    }
}

/// Picks a cell uniformly, row first.
pub fn random_cell(rows: usize, cols: usize, rng: &mut impl UniformSource) -> Cell {
    assert!(rows > 0 && cols > 0, "grid must have at least one cell");
    let row = rng.below(rows);
    let col = rng.below(cols);
    Cell { row, col }
}

/// Connectivity of a generated maze. A `true` wall entry is an open passage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    visited: Vec<Vec<bool>>,
    verticals: Vec<Vec<bool>>,
    horizontals: Vec<Vec<bool>>,
}

struct Frame {
    cell: Cell,
    neighbors: [Dir; 4],
    next: usize,
}

impl Maze {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn visited(&self) -> &[Vec<bool>] {
        &self.visited
    }

    pub fn verticals(&self) -> &[Vec<bool>] {
        &self.verticals
    }

    pub fn horizontals(&self) -> &[Vec<bool>] {
        &self.horizontals
    }

    pub fn passage_count(&self) -> usize {
        self.verticals
            .iter()
            .chain(self.horizontals.iter())
            .flat_map(|row| row.iter())
            .filter(|&&open| open)
            .count()
    }

    pub fn wall_count(&self) -> usize {
        let verticals = self.rows * (self.cols - 1);
        let horizontals = (self.rows - 1) * self.cols;
        verticals + horizontals - self.passage_count()
    }

    /// Whether adjacent cells `a` and `b` share an open passage. Non-adjacent
    /// cells are never open.
    pub fn is_open(&self, a: Cell, b: Cell) -> bool {
        if a.row == b.row {
            if a.col + 1 == b.col {
                return self.verticals[a.row][a.col];
            }
            if b.col + 1 == a.col {
                return self.verticals[a.row][b.col];
            }
        } else if a.col == b.col {
            if a.row + 1 == b.row {
                return self.horizontals[a.row][a.col];
            }
            if b.row + 1 == a.row {
                return self.horizontals[b.row][a.col];
            }
        }
        false
    }

    pub fn open_neighbors(&self, cell: Cell) -> Vec<Cell> {
        [Dir::Up, Dir::Left, Dir::Down, Dir::Right]
            .into_iter()
            .filter_map(|dir| self.step(cell, dir))
            .filter(|next| self.is_open(cell, *next))
            .collect()
    }

    fn step(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        let row = cell.row as isize + dr;
        let col = cell.col as isize + dc;
        if row < 0 || col < 0 || row >= self.rows as isize || col >= self.cols as isize {
            return None;
        }
        Some(Cell {
            row: row as usize,
            col: col as usize,
        })
    }

    fn open_between(&mut self, cell: Cell, dir: Dir) {
        match dir {
            Dir::Left => self.verticals[cell.row][cell.col - 1] = true,
            Dir::Right => self.verticals[cell.row][cell.col] = true,
            Dir::Up => self.horizontals[cell.row - 1][cell.col] = true,
            Dir::Down => self.horizontals[cell.row][cell.col] = true,
        }
    }

    fn enter(&mut self, cell: Cell, rng: &mut impl UniformSource) -> Frame {
        self.visited[cell.row][cell.col] = true;
        let mut neighbors = [Dir::Up, Dir::Left, Dir::Down, Dir::Right];
        shuffle(&mut neighbors, rng);
        Frame {
            cell,
            neighbors,
            next: 0,
        }
    }
}

/// Carves a perfect maze over a `rows x cols` grid starting at `start`.
///
/// The traversal keeps an explicit stack of frames, each holding its cell and
/// the neighbors it has yet to try, and draws random numbers in the same order
/// a recursive carve would.
pub fn generate(rows: usize, cols: usize, start: Cell, rng: &mut impl UniformSource) -> Maze {
    assert!(rows > 0 && cols > 0, "grid must have at least one cell");
    assert!(
        start.row < rows && start.col < cols,
        "start cell {:?} outside {}x{} grid",
        start,
        rows,
        cols
    );

    let mut maze = Maze {
        rows,
        cols,
        visited: vec![vec![false; cols]; rows],
        verticals: vec![vec![false; cols - 1]; rows],
        horizontals: vec![vec![false; cols]; rows - 1],
    };

    let mut stack = vec![maze.enter(start, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.neighbors.len() {
            stack.pop();
            continue;
        }
        let dir = frame.neighbors[frame.next];
        frame.next += 1;
        let cell = frame.cell;

        let Some(next) = maze.step(cell, dir) else {
            continue;
        };
        if maze.visited[next.row][next.col] {
            continue;
        }
        maze.open_between(cell, dir);
        let frame = maze.enter(next, rng);
        stack.push(frame);
    }

    maze
}
