//! Core type definitions for the application

/// Which panel of the shell is currently displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Audio,
    Video,
    Archives,
    Game,
}

impl ActiveSection {
    pub const ALL: [ActiveSection; 4] = [
        ActiveSection::Audio,
        ActiveSection::Video,
        ActiveSection::Archives,
        ActiveSection::Game,
    ];

    pub fn next(self) -> Self {
        match self {
            ActiveSection::Audio => ActiveSection::Video,
            ActiveSection::Video => ActiveSection::Archives,
            ActiveSection::Archives => ActiveSection::Game,
            ActiveSection::Game => ActiveSection::Audio,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Audio => ActiveSection::Game,
            ActiveSection::Video => ActiveSection::Audio,
            ActiveSection::Archives => ActiveSection::Video,
            ActiveSection::Game => ActiveSection::Archives,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActiveSection::Audio => "Audio Player",
            ActiveSection::Video => "Video Gallery",
            ActiveSection::Archives => "Archives",
            ActiveSection::Game => "The Game",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ActiveSection::Audio => "▶",
            ActiveSection::Video => "◉",
            ActiveSection::Archives => "▣",
            ActiveSection::Game => "◈",
        }
    }

    /// Section bound to the digit keys 1-4
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub video_selected: usize,
    pub archive_selected: usize,
    pub show_help_popup: bool,
    pub should_quit: bool,
}
