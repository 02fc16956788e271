//! Video file discovery.

use std::io;
use std::path::{Path, PathBuf};

/// Extensions recognized as video input, lowercase.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "m4v"];

/// Find video files in a directory, sorted for deterministic batch order.
///
/// Matching is case-insensitive on the extension. With `recursive`,
/// subdirectories are searched too.
pub fn find_video_files(directory: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    visit(directory, recursive, &mut found)?;
    found.sort();
    Ok(found)
}

fn visit(directory: &Path, recursive: bool, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                visit(&path, recursive, found)?;
            }
        } else if is_video_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// True when the path carries a recognized video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
