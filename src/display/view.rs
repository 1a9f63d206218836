/// Which raster the render loop shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Current best specimen.
    #[default]
    Normal,
    /// Difference between the best specimen and the target.
    Diff,
    /// The target itself.
    Original,
}

/// A key press as seen by the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show(ViewMode),
    ToggleDebug,
    ToggleLock,
    NextImage,
    Quit,
}

impl Command {
    /// Key binding table. Unbound keys map to `None` and are ignored.
    pub fn from_key(key: Key) -> Option<Command> {
        match key {
            Key::Char('d') => Some(Command::Show(ViewMode::Diff)),
            Key::Char('i') => Some(Command::ToggleDebug),
            Key::Char('l') => Some(Command::ToggleLock),
            Key::Char('m') => Some(Command::Show(ViewMode::Normal)),
            Key::Char('n') => Some(Command::NextImage),
            Key::Char('o') => Some(Command::Show(ViewMode::Original)),
            Key::Escape => Some(Command::Quit),
            Key::Char(_) | Key::Other => None,
        }
    }
}
