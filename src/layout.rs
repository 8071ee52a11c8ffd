use crate::maze::Maze;

/// Axis-aligned rectangle given by its center and full size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub border_thickness: f32,
    /// Goal side as a fraction of one cell.
    pub goal_ratio: f32,
    /// Ball radius as a fraction of the shorter cell side.
    pub ball_ratio: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            wall_thickness: 10.0,
            border_thickness: 2.0,
            goal_ratio: 0.7,
            ball_ratio: 0.25,
        }
    }
}

/// Static geometry handed to the physics world. Coordinates grow right and
/// down from the top-left corner of the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub unit_x: f32,
    pub unit_y: f32,
    pub borders: Vec<Rect>,
    pub walls: Vec<Rect>,
    pub goal: Rect,
    pub ball: Circle,
}

pub fn project(maze: &Maze, params: &LayoutParams) -> Layout {
    assert!(
        params.width > 0.0 && params.height > 0.0,
        "viewport must have a positive size"
    );
    assert!(
        params.width.is_finite() && params.height.is_finite(),
        "viewport must have a finite size"
    );
    assert!(
        params.wall_thickness > 0.0 && params.border_thickness > 0.0,
        "walls must have a positive thickness"
    );
    assert!(
        params.goal_ratio > 0.0 && params.ball_ratio > 0.0,
        "goal and ball ratios must be positive"
    );

    let (width, height) = (params.width, params.height);
    let unit_x = width / maze.cols() as f32;
    let unit_y = height / maze.rows() as f32;

    let t = params.border_thickness;
    let borders = vec![
        Rect::new(width / 2.0, 0.0, width, t),
        Rect::new(width / 2.0, height, width, t),
        Rect::new(0.0, height / 2.0, t, height),
        Rect::new(width, height / 2.0, t, height),
    ];

    let mut walls = Vec::new();
    for (row, edges) in maze.horizontals().iter().enumerate() {
        for (col, &open) in edges.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(Rect {
                x: col as f32 * unit_x + unit_x / 2.0,
                y: row as f32 * unit_y + unit_y,
                width: unit_x,
                height: params.wall_thickness,
            });
        }
    }
    for (row, edges) in maze.verticals().iter().enumerate() {
        for (col, &open) in edges.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(Rect {
                x: col as f32 * unit_x + unit_x,
                y: row as f32 * unit_y + unit_y / 2.0,
                width: params.wall_thickness,
                height: unit_y,
            });
        }
    }

    let goal = Rect {
        x: width - unit_x / 2.0,
        y: height - unit_y / 2.0,
        width: unit_x * params.goal_ratio,
        height: unit_y * params.goal_ratio,
    };

    let ball = Circle {
        x: unit_x / 2.0,
        y: unit_y / 2.0,
        radius: unit_x.min(unit_y) * params.ball_ratio,
    };

    Layout {
        width,
        height,
        unit_x,
        unit_y,
        borders,
        walls,
        goal,
        ball,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{generate, Cell};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square(cells: usize, seed: u64) -> Maze {
        let start = Cell::new(1.min(cells - 1), 1.min(cells - 1));
        generate(cells, cells, start, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn one_wall_per_closed_edge() {
        let maze = square(5, 11);
        let layout = project(&maze, &LayoutParams::default());
        assert_eq!(layout.walls.len(), maze.wall_count());
        assert_eq!(layout.walls.len(), 40 - 24);
        assert_eq!(layout.borders.len(), 4);
    }

    #[test]
    fn closed_vertical_edge_position() {
        // Find a seed whose maze keeps the wall between (0, 0) and (0, 1).
        let maze = (0..200)
            .map(|seed| square(3, seed))
            .find(|maze| !maze.verticals()[0][0])
            .expect("some seed closes the first vertical edge");
        let params = LayoutParams::default();
        let layout = project(&maze, &params);
        assert_eq!(layout.unit_x, 200.0);
        assert_eq!(layout.unit_y, 200.0);
        let wall = layout
            .walls
            .iter()
            .find(|w| w.x == 200.0 && w.y == 100.0)
            .expect("wall between (0,0) and (0,1)");
        assert_eq!(wall.width, params.wall_thickness);
        assert_eq!(wall.height, 200.0);
    }

    #[test]
    fn closed_horizontal_edge_position() {
        let maze = (0..200)
            .map(|seed| square(3, seed))
            .find(|maze| !maze.horizontals()[1][2])
            .expect("some seed closes the edge below (1, 2)");
        let layout = project(&maze, &LayoutParams::default());
        let wall = layout
            .walls
            .iter()
            .find(|w| w.x == 500.0 && w.y == 400.0)
            .expect("wall between (1,2) and (2,2)");
        assert_eq!(wall.width, 200.0);
        assert_eq!(wall.height, 10.0);
    }

    #[test]
    fn goal_and_ball_placement() {
        let maze = square(3, 4);
        let layout = project(&maze, &LayoutParams::default());
        assert_eq!(layout.goal, Rect::new(500.0, 500.0, 140.0, 140.0));
        assert_eq!(
            layout.ball,
            Circle {
                x: 100.0,
                y: 100.0,
                radius: 50.0
            }
        );
    }

    #[test]
    fn rectangular_cells_use_independent_units() {
        let maze = generate(4, 8, Cell::new(0, 0), &mut StdRng::seed_from_u64(8));
        let params = LayoutParams {
            width: 800.0,
            height: 200.0,
            ..LayoutParams::default()
        };
        let layout = project(&maze, &params);
        assert_eq!(layout.unit_x, 100.0);
        assert_eq!(layout.unit_y, 50.0);
        assert_eq!(layout.goal.x, 750.0);
        assert_eq!(layout.goal.y, 175.0);
        assert_eq!(layout.goal.width, 70.0);
        assert_eq!(layout.goal.height, 35.0);
        assert_eq!(layout.ball.radius, 12.5);
        for wall in &layout.walls {
            assert!(wall.x >= 0.0 && wall.x <= 800.0);
            assert!(wall.y >= 0.0 && wall.y <= 200.0);
        }
    }

    #[test]
    fn single_cell_has_no_walls() {
        let maze = generate(1, 1, Cell::new(0, 0), &mut StdRng::seed_from_u64(0));
        let layout = project(&maze, &LayoutParams::default());
        assert!(layout.walls.is_empty());
        assert_eq!(layout.goal.x, layout.ball.x);
        assert_eq!(layout.goal.y, layout.ball.y);
    }

    #[test]
    #[should_panic]
    fn zero_width_is_rejected() {
        let maze = square(2, 0);
        project(
            &maze,
            &LayoutParams {
                width: 0.0,
                ..LayoutParams::default()
            },
        );
    }

    #[test]
    #[should_panic(expected = "finite")]
    fn infinite_height_is_rejected() {
        let maze = square(2, 0);
        project(
            &maze,
            &LayoutParams {
                height: f32::INFINITY,
                ..LayoutParams::default()
            },
        );
    }
}
