//! Terminal drawing. The world is rasterized onto a canvas whose cells are
//! two columns wide, and only cells that changed since the last frame are
//! written.

use crate::game::Game;
use crate::world::{BodyKind, BodyView, Extent};
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use rapier2d::prelude::Point;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

pub const CELL_W: usize = 2;
/// Rows reserved above and below the canvas.
const HUD_ROWS: usize = 2;
const MIN_CANVAS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Glyph {
    Empty,
    Border,
    Wall,
    Goal,
    Ball,
}

impl Glyph {
    fn for_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Border => Glyph::Border,
            BodyKind::Wall => Glyph::Wall,
            BodyKind::Goal => Glyph::Goal,
            BodyKind::Ball => Glyph::Ball,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub cols: usize,
    pub rows: usize,
    /// Canvas cells per world unit.
    pub scale: f32,
}

/// Largest canvas that fits `avail_cols x avail_rows` while keeping the
/// world's aspect ratio.
pub fn fit(world_w: f32, world_h: f32, avail_cols: usize, avail_rows: usize) -> Option<Canvas> {
    let scale = (avail_cols as f32 / world_w).min(avail_rows as f32 / world_h);
    let cols = ((world_w * scale).round() as usize).min(avail_cols);
    let rows = ((world_h * scale).round() as usize).min(avail_rows);
    if cols < MIN_CANVAS || rows < MIN_CANVAS {
        return None;
    }
    Some(Canvas { cols, rows, scale })
}

fn covers(body: &BodyView, x: f32, y: f32, pad: f32) -> bool {
    let local = body.position.inverse_transform_point(&Point::new(x, y));
    match body.extent {
        Extent::Cuboid {
            half_width,
            half_height,
        } => local.x.abs() <= half_width + pad && local.y.abs() <= half_height + pad,
        Extent::Ball { radius } => local.coords.norm() <= radius + pad,
    }
}

/// Row-major glyphs for `canvas`. Each cell shows the highest ranked body
/// covering its center; shapes are padded by just under half a cell so thin
/// walls never fall between samples.
pub fn rasterize(bodies: &[BodyView], canvas: &Canvas) -> Vec<Glyph> {
    let pad = 0.45 / canvas.scale;
    let mut glyphs = vec![Glyph::Empty; canvas.cols * canvas.rows];
    for row in 0..canvas.rows {
        for col in 0..canvas.cols {
            let x = (col as f32 + 0.5) / canvas.scale;
            let y = (row as f32 + 0.5) / canvas.scale;
            let idx = row * canvas.cols + col;
            for body in bodies {
                let glyph = Glyph::for_kind(body.kind);
                if glyph > glyphs[idx] && covers(body, x, y, pad) {
                    glyphs[idx] = glyph;
                }
            }
        }
    }
    glyphs
}

pub struct Renderer {
    last: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
    canvas: Option<Canvas>,
    origin_x: u16,
    origin_y: u16,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            needs_full: true,
            canvas: None,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    fn place(&mut self, canvas: Canvas, origin_x: u16, origin_y: u16) {
        let moved = origin_x != self.origin_x || origin_y != self.origin_y;
        if moved || self.canvas != Some(canvas) {
            self.canvas = Some(canvas);
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.last = vec![Glyph::Empty; canvas.cols * canvas.rows];
            self.needs_full = true;
        }
    }

    fn hud_changed(&mut self, hud: &str) -> bool {
        if self.needs_full || hud != self.last_hud {
            self.last_hud = hud.to_string();
            return true;
        }
        false
    }

    /// Indices of the cells to draw this frame; remembers `glyphs` as drawn.
    fn diff(&mut self, glyphs: &[Glyph]) -> Vec<usize> {
        let mut dirty = Vec::new();
        for (idx, &glyph) in glyphs.iter().enumerate() {
            if self.needs_full || glyph != self.last[idx] {
                self.last[idx] = glyph;
                dirty.push(idx);
            }
        }
        self.needs_full = false;
        dirty
    }
}

pub fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let layout = game.layout();
    let (term_w, term_h) = terminal::size()?;
    let avail_cols = term_w as usize / CELL_W;
    let avail_rows = (term_h as usize).saturating_sub(HUD_ROWS);

    stdout.queue(MoveTo(0, 0))?;
    let Some(canvas) = fit(layout.width, layout.height, avail_cols, avail_rows) else {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            MIN_CANVAS * CELL_W,
            MIN_CANVAS + HUD_ROWS,
            term_w,
            term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    };

    let origin_x = ((avail_cols - canvas.cols) * CELL_W / 2) as u16;
    let origin_y = ((avail_rows - canvas.rows) / 2 + 1) as u16;
    renderer.place(canvas, origin_x, origin_y);
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(game);
    if renderer.hud_changed(&hud) {
        let color = if game.world().won() {
            Color::Green
        } else {
            Color::White
        };
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
    }

    let glyphs = rasterize(&game.world().bodies(), &canvas);
    for idx in renderer.diff(&glyphs) {
        let (row, col) = (idx / canvas.cols, idx % canvas.cols);
        draw_cell(stdout, renderer, col, row, glyphs[idx])?;
    }

    stdout.flush()?;
    Ok(())
}

fn hud_line(game: &Game) -> String {
    let settings = game.settings();
    if game.world().won() {
        format!("Level {} solved!  n: new maze  q: quit", game.level())
    } else {
        format!(
            "Level {}  Maze {}x{}  WASD/arrows: roll  n: new maze  q: quit",
            game.level(),
            settings.cells_x,
            settings.cells_y
        )
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, glyph: Glyph) -> io::Result<()> {
    let (text, color) = match glyph {
        Glyph::Empty => ("  ", Color::Reset),
        Glyph::Border => ("░░", Color::DarkGrey),
        Glyph::Wall => ("██", Color::Blue),
        Glyph::Goal => ("▒▒", Color::Green),
        Glyph::Ball => ("●", Color::Yellow),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::{Isometry, Vector};

    fn rect(kind: BodyKind, x: f32, y: f32, w: f32, h: f32) -> BodyView {
        BodyView {
            kind,
            position: Isometry::translation(x, y),
            extent: Extent::Cuboid {
                half_width: w / 2.0,
                half_height: h / 2.0,
            },
        }
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let canvas = fit(600.0, 300.0, 40, 40).expect("fits");
        assert_eq!(canvas.cols, 40);
        assert_eq!(canvas.rows, 20);
        let canvas = fit(600.0, 600.0, 80, 20).expect("fits");
        assert_eq!((canvas.cols, canvas.rows), (20, 20));
        assert!(fit(600.0, 600.0, 3, 20).is_none());
    }

    #[test]
    fn thin_wall_always_shows() {
        // Ten units thick on a canvas of 20 units per cell.
        let canvas = Canvas {
            cols: 10,
            rows: 10,
            scale: 0.05,
        };
        for x in [95.0, 100.0, 104.0, 110.0, 117.0] {
            let wall = rect(BodyKind::Wall, x, 100.0, 10.0, 200.0);
            let glyphs = rasterize(&[wall], &canvas);
            for row in 0..canvas.rows {
                let hits = (0..canvas.cols)
                    .filter(|col| glyphs[row * canvas.cols + col] == Glyph::Wall)
                    .count();
                assert!((1..=2).contains(&hits), "wall at {} row {} hits {}", x, row, hits);
            }
        }
    }

    #[test]
    fn ball_draws_over_goal_over_wall() {
        let canvas = Canvas {
            cols: 5,
            rows: 5,
            scale: 0.05,
        };
        let wall = rect(BodyKind::Wall, 30.0, 30.0, 60.0, 60.0);
        let goal = rect(BodyKind::Goal, 50.0, 50.0, 40.0, 40.0);
        let ball = BodyView {
            kind: BodyKind::Ball,
            position: Isometry::translation(50.0, 50.0),
            extent: Extent::Ball { radius: 1.0 },
        };
        let glyphs = rasterize(&[ball, goal, wall], &canvas);
        assert_eq!(glyphs[2 * 5 + 2], Glyph::Ball);
        assert_eq!(glyphs[2 * 5 + 1], Glyph::Goal);
        assert_eq!(glyphs[0], Glyph::Wall);
        assert_eq!(glyphs[4 * 5 + 4], Glyph::Empty);
    }

    #[test]
    fn rotated_bodies_use_local_frame() {
        let canvas = Canvas {
            cols: 10,
            rows: 10,
            scale: 0.05,
        };
        let mut wall = rect(BodyKind::Wall, 100.0, 100.0, 200.0, 10.0);
        wall.position = Isometry::new(Vector::new(100.0, 100.0), std::f32::consts::FRAC_PI_2);
        let glyphs = rasterize(&[wall], &canvas);
        // Turned upright: column 4 or 5 is filled top to bottom, row 0 corners stay empty.
        assert!(glyphs[0] == Glyph::Empty && glyphs[9] == Glyph::Empty);
        for row in 0..10 {
            assert!(glyphs[row * 10 + 4] == Glyph::Wall || glyphs[row * 10 + 5] == Glyph::Wall);
        }
    }

    #[test]
    fn only_changed_cells_are_redrawn() {
        let canvas = Canvas {
            cols: 3,
            rows: 2,
            scale: 0.01,
        };
        let mut renderer = Renderer::new();
        renderer.place(canvas, 4, 2);

        let mut glyphs = vec![Glyph::Empty; 6];
        glyphs[1] = Glyph::Wall;
        assert_eq!(renderer.diff(&glyphs), vec![0, 1, 2, 3, 4, 5]);
        assert!(renderer.diff(&glyphs).is_empty());

        glyphs[4] = Glyph::Ball;
        glyphs[1] = Glyph::Empty;
        assert_eq!(renderer.diff(&glyphs), vec![1, 4]);
        assert!(renderer.diff(&glyphs).is_empty());
    }

    #[test]
    fn moving_or_invalidating_forces_full_redraw() {
        let canvas = Canvas {
            cols: 2,
            rows: 2,
            scale: 0.01,
        };
        let glyphs = vec![Glyph::Wall; 4];
        let mut renderer = Renderer::new();
        renderer.place(canvas, 0, 1);
        renderer.diff(&glyphs);

        renderer.place(canvas, 0, 1);
        assert!(renderer.diff(&glyphs).is_empty());

        renderer.place(canvas, 3, 1);
        assert_eq!(renderer.diff(&glyphs).len(), 4);

        let wider = Canvas { cols: 4, ..canvas };
        renderer.place(wider, 3, 1);
        assert_eq!(renderer.diff(&[Glyph::Empty; 8]).len(), 8);

        renderer.invalidate();
        assert_eq!(renderer.diff(&[Glyph::Empty; 8]).len(), 8);
    }

    #[test]
    fn hud_redraws_on_change_or_full_frame() {
        let mut renderer = Renderer::new();
        assert!(renderer.hud_changed("Level 1"));
        renderer.diff(&[]);
        assert!(!renderer.hud_changed("Level 1"));
        assert!(renderer.hud_changed("Level 1 solved!"));
        renderer.invalidate();
        assert!(renderer.hud_changed("Level 1 solved!"));
    }
}
