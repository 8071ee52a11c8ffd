use ball_maze::config::Settings;
use ball_maze::game::Game;
use ball_maze::input::command_for;
use ball_maze::render::{render, Renderer};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

fn main() -> io::Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings);
    log::info!("starting with {:?}", settings);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    if let Err(err) = &result {
        log::error!("terminal error: {}", err);
    }
    result
}

/// Logs go to the file named by `MAZE_LOG`; the terminal belongs to the game.
fn init_logging(settings: &Settings) {
    let Some(path) = &settings.log_file else {
        return;
    };
    match File::create(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("cannot open log file {}: {}", path.display(), err),
    }
}

fn run(stdout: &mut Stdout, settings: Settings) -> io::Result<()> {
    let tick = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut game = Game::new(settings);
    let mut renderer = Renderer::new();
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = command_for(key) {
                        if !game.apply(command) {
                            log::info!("quit at level {}", game.level());
                            return Ok(());
                        }
                    }
                }
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            game.tick();
        }
        render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
