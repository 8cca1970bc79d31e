//! Static disc contents shown by the video gallery and archives panels

/// A video placeholder in the gallery
#[derive(Clone, Copy, Debug)]
pub struct VideoEntry {
    pub id: u32,
    pub title: &'static str,
}

/// A file or folder on the disc
#[derive(Clone, Copy, Debug)]
pub struct ArchiveEntry {
    pub name: &'static str,
    pub size: &'static str,
    pub date: &'static str,
}

impl ArchiveEntry {
    pub fn is_folder(&self) -> bool {
        self.name.ends_with('/')
    }
}

pub const VIDEO_FORMAT: &str = "320×240 :: 29.97fps";

pub const VIDEOS: [VideoEntry; 4] = [
    VideoEntry { id: 1, title: "PERFORMANCE_001.mpg" },
    VideoEntry { id: 2, title: "BEHIND_SCENES_02.mpg" },
    VideoEntry { id: 3, title: "STUDIO_SESSION.mpg" },
    VideoEntry { id: 4, title: "MUSIC_VIDEO_01.mpg" },
];

pub const ARCHIVES: [ArchiveEntry; 6] = [
    ArchiveEntry { name: "LINER_NOTES.txt", size: "4KB", date: "2000.06.20" },
    ArchiveEntry { name: "CREDITS.txt", size: "2KB", date: "2000.06.20" },
    ArchiveEntry { name: "LYRICS/", size: "12KB", date: "2000.06.20" },
    ArchiveEntry { name: "PHOTOS/", size: "2.4MB", date: "2000.06.20" },
    ArchiveEntry { name: "WALLPAPERS/", size: "1.8MB", date: "2000.06.20" },
    ArchiveEntry { name: "README.txt", size: "1KB", date: "2000.06.20" },
];

pub const AUDIO_SPECIFICATIONS: [&str; 4] = [
    "16-BIT STEREO",
    "44.1KHZ SAMPLING",
    "CD QUALITY AUDIO",
    "MULTI-FORMAT SUPPORT",
];

pub const AUDIO_FORMATS: [&str; 4] = ["MP3", "WAV", "OGG", "FLAC"];

pub const QUICK_START: [&str; 4] = [
    "1. PRESS \"1\" TO OPEN THE AUDIO PANEL",
    "2. PRESS \"SPACE\" TO BEGIN PLAYBACK",
    "3. USE \"N\" / \"P\" TO CHANGE TRACK",
    "4. ADJUST VOLUME WITH \"+\" AND \"-\"",
];

/// Move a list selection up, stopping at the first entry
pub fn select_prev(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Move a list selection down, stopping at the last entry
pub fn select_next(selected: usize, len: usize) -> usize {
    if selected + 1 < len { selected + 1 } else { selected }
}
