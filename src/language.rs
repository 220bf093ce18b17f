use std::path::Path;

/// Program listing formats recognized by tp-renumber
///
/// Only Teach Pendant listings take part in renumbering; every other file is
/// `Unknown` and ignored by the session and the directory rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Fanuc Teach Pendant ASCII listing (.ls)
    FanucTp,
    /// Unknown or unsupported format
    Unknown,
}

impl Language {
    pub fn name(&self) -> &str {
        match self {
            Language::FanucTp => "Fanuc TP",
            Language::Unknown => "Unknown",
        }
    }

    /// Check if documents of this format get line renumbering
    pub fn is_supported(&self) -> bool {
        !matches!(self, Language::Unknown)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the listing format from a file path
///
/// The extension is compared case-insensitively, since controllers export
/// `MAIN.LS` as often as `main.ls`.
///
/// # Examples
/// ```
/// use tp_renumber::{Language, detect_language};
/// assert_eq!(detect_language("MAIN.LS"), Language::FanucTp);
/// assert_eq!(detect_language("pick/place.ls"), Language::FanucTp);
/// assert_eq!(detect_language("notes.txt"), Language::Unknown);
/// ```
pub fn detect_language<P: AsRef<Path>>(path: P) -> Language {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if extension.eq_ignore_ascii_case("ls") {
        Language::FanucTp
    } else {
        Language::Unknown
    }
}

/// Shorthand for `detect_language(path) == Language::FanucTp`
pub fn is_program_file<P: AsRef<Path>>(path: P) -> bool {
    detect_language(path) == Language::FanucTp
}
