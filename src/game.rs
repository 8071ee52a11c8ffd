use crate::config::Settings;
use crate::input::Command;
use crate::layout::{project, Layout};
use crate::maze::{generate, random_cell, Maze};
use crate::world::MazeWorld;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One play session: the current maze, its geometry and the running world.
pub struct Game {
    settings: Settings,
    rng: StdRng,
    level: u32,
    maze: Maze,
    layout: Layout,
    world: MazeWorld,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (maze, layout, world) = build(&settings, &mut rng);
        Self {
            settings,
            rng,
            level: 1,
            maze,
            layout,
            world,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn world(&self) -> &MazeWorld {
        &self.world
    }

    /// Carves a fresh maze with the same settings.
    pub fn restart(&mut self) {
        self.level += 1;
        let (maze, layout, world) = build(&self.settings, &mut self.rng);
        self.maze = maze;
        self.layout = layout;
        self.world = world;
    }

    /// Returns false once the player asked to quit.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Nudge(heading) => {
                log::debug!("nudge {:?}", heading);
                self.world.nudge(heading);
            }
            Command::NewMaze => self.restart(),
            Command::Quit => return false,
        }
        true
    }

    pub fn tick(&mut self) {
        if self.world.step() {
            log::info!("level {} solved, releasing walls", self.level);
        }
    }
}

fn build(settings: &Settings, rng: &mut StdRng) -> (Maze, Layout, MazeWorld) {
    let (rows, cols) = (settings.cells_y, settings.cells_x);
    let start = random_cell(rows, cols, rng);
    let maze = generate(rows, cols, start, rng);
    log::info!(
        "carved {}x{} maze from ({}, {}): {} passages, {} walls",
        rows,
        cols,
        start.row,
        start.col,
        maze.passage_count(),
        maze.wall_count()
    );
    let layout = project(&maze, &settings.layout_params());
    let world = MazeWorld::new(&layout, settings.world_params());
    (maze, layout, world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Heading;

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Settings::default()
        }
    }

    #[test]
    fn seed_reproduces_the_maze() {
        let a = Game::new(seeded(10));
        let b = Game::new(seeded(10));
        assert_eq!(a.maze(), b.maze());
        assert_eq!(a.layout(), b.layout());
    }

    #[test]
    fn maze_matches_settings() {
        let settings = Settings {
            cells_x: 7,
            cells_y: 3,
            width: 700.0,
            height: 300.0,
            ..seeded(1)
        };
        let game = Game::new(settings);
        assert_eq!(game.maze().rows(), 3);
        assert_eq!(game.maze().cols(), 7);
        assert_eq!(game.layout().unit_x, 100.0);
        assert_eq!(game.layout().unit_y, 100.0);
        assert_eq!(game.layout().walls.len(), game.maze().wall_count());
    }

    #[test]
    fn new_maze_bumps_level_and_resets_world() {
        let mut game = Game::new(seeded(3));
        assert!(game.apply(Command::Nudge(Heading::Down)));
        assert!(game.world().ball_velocity().y > 0.0);

        let first = game.maze().clone();
        let mut changed = false;
        for _ in 0..5 {
            assert!(game.apply(Command::NewMaze));
            changed |= *game.maze() != first;
        }
        assert_eq!(game.level(), 6);
        assert!(changed);
        assert_eq!(game.world().ball_velocity().y, 0.0);
        assert!(!game.world().won());
    }

    #[test]
    fn quit_stops_the_session() {
        let mut game = Game::new(seeded(4));
        assert!(!game.apply(Command::Quit));
    }

    #[test]
    fn single_cell_game_is_won_on_first_ticks() {
        let settings = Settings {
            cells_x: 1,
            cells_y: 1,
            ..seeded(5)
        };
        let mut game = Game::new(settings);
        for _ in 0..5 {
            game.tick();
        }
        assert!(game.world().won());
    }
}
