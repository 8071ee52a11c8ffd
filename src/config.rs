use crate::layout::LayoutParams;
use crate::world::WorldParams;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_CELLS_X: usize = 6;
const DEFAULT_CELLS_Y: usize = 5;
const DEFAULT_WIDTH: f32 = 600.0;
const DEFAULT_HEIGHT: f32 = 500.0;
const DEFAULT_WALL: f32 = 10.0;
const DEFAULT_NUDGE: f32 = 120.0;
const DEFAULT_GRAVITY: f32 = 900.0;
const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub cells_x: usize,
    pub cells_y: usize,
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub nudge_speed: f32,
    pub win_gravity: f32,
    pub tick_ms: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cells_x: DEFAULT_CELLS_X,
            cells_y: DEFAULT_CELLS_Y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wall_thickness: DEFAULT_WALL,
            nudge_speed: DEFAULT_NUDGE,
            win_gravity: DEFAULT_GRAVITY,
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every setting through `lookup`. Missing, malformed and
    /// non-positive values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            cells_x: positive(&lookup, "MAZE_CELLS_X", defaults.cells_x, 0),
            cells_y: positive(&lookup, "MAZE_CELLS_Y", defaults.cells_y, 0),
            width: length(&lookup, "MAZE_WIDTH", defaults.width),
            height: length(&lookup, "MAZE_HEIGHT", defaults.height),
            wall_thickness: length(&lookup, "MAZE_WALL", defaults.wall_thickness),
            nudge_speed: length(&lookup, "MAZE_NUDGE", defaults.nudge_speed),
            win_gravity: length(&lookup, "MAZE_GRAVITY", defaults.win_gravity),
            tick_ms: positive(&lookup, "MAZE_TICK_MS", defaults.tick_ms, 0),
            render_fps: positive(&lookup, "MAZE_FPS", defaults.render_fps, 0),
            seed: lookup("MAZE_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
            log_file: lookup("MAZE_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            width: self.width,
            height: self.height,
            wall_thickness: self.wall_thickness,
            ..LayoutParams::default()
        }
    }

    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            nudge_speed: self.nudge_speed,
            win_gravity: self.win_gravity,
            dt: self.tick_ms as f32 / 1000.0,
        }
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T, zero: T) -> T
where
    T: FromStr + PartialOrd,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > zero)
        .unwrap_or(default)
}

fn length(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f32) -> f32 {
    let value = positive(lookup, key, default, 0.0);
    if value.is_finite() {
        value
    } else {
        default
    }
}
