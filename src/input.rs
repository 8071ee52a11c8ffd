use crate::world::Heading;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Nudge(Heading),
    NewMaze,
    Quit,
}

/// Maps a key event to a command. Releases are ignored.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => command_for_code(key.code),
        _ => None,
    }
}

fn command_for_code(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => Some(Command::Nudge(Heading::Up)),
        KeyCode::Down => Some(Command::Nudge(Heading::Down)),
        KeyCode::Left => Some(Command::Nudge(Heading::Left)),
        KeyCode::Right => Some(Command::Nudge(Heading::Right)),
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' | 'k' => Some(Command::Nudge(Heading::Up)),
            's' | 'j' => Some(Command::Nudge(Heading::Down)),
            'a' | 'h' => Some(Command::Nudge(Heading::Left)),
            'd' | 'l' => Some(Command::Nudge(Heading::Right)),
            'n' => Some(Command::NewMaze),
            'q' => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}
