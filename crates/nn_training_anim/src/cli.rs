use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated neural network training illustration", long_about = None)]
pub struct Cli {
    /// Pass `save` to export a video instead of opening a window
    pub mode: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Open the playback window (default)
    Display,
    /// Encode every frame to a video file
    Save,
}

impl Mode {
    /// Anything starting with "save", case-insensitively, selects export.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(a) if a.to_lowercase().starts_with("save") => Mode::Save,
            _ => Mode::Display,
        }
    }
}

impl Cli {
    pub fn mode(&self) -> Mode {
        Mode::from_arg(self.mode.as_deref())
    }
}
