use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

/// Lower-cased extensions a directory walk keeps, without leading dots.
struct AudioFilter {
    extensions: Vec<String>,
}

impl AudioFilter {
    fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Dot-files and dot-directories, except the walk root itself.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|n| n.starts_with('.'))
}

/// Audio files under `dir`, ordered case-insensitively by path.
fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let filter = AudioFilter::new(settings);

    // max_depth counts the root as 0; a flat scan stops at its children.
    let depth = match (settings.recursive, settings.max_depth) {
        (false, _) => 1,
        (true, Some(d)) => d,
        (true, None) => usize::MAX,
    };

    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .max_depth(depth)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .map(DirEntry::into_path)
        .filter(|p| filter.accepts(p))
        .collect();

    found.sort_by_cached_key(|p| p.to_string_lossy().to_lowercase());
    found
}

/// Resolve user-picked inputs into playable file paths.
///
/// Files are taken as-is, whatever their extension; directories are expanded
/// to the audio files they contain. Inputs are processed in order and a
/// leading `~` is expanded. Missing paths are skipped.
pub fn expand_paths<I, S>(inputs: I, settings: &LibrarySettings) -> Vec<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths = Vec::new();

    for input in inputs {
        let raw = input.as_ref().trim();
        if raw.is_empty() {
            continue;
        }

        let path = PathBuf::from(shellexpand::tilde(raw).as_ref());
        if path.is_dir() {
            let found = scan_dir(&path, settings);
            log::info!("found {} audio files under {}", found.len(), path.display());
            paths.extend(found);
        } else if path.is_file() {
            paths.push(path);
        } else {
            log::warn!("skipping {}: no such file or directory", path.display());
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"not really audio").unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn filter_normalises_configured_extensions() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), " opus ".into(), "".into()],
            ..LibrarySettings::default()
        };
        let filter = AudioFilter::new(&settings);
        assert!(filter.accepts(Path::new("/m/a.mp3")));
        assert!(filter.accepts(Path::new("/m/a.Mp3")));
        assert!(filter.accepts(Path::new("/m/b.opus")));
        assert!(!filter.accepts(Path::new("/m/c.flac")));
        assert!(!filter.accepts(Path::new("/m/no_extension")));
    }

    #[test]
    fn scan_keeps_audio_sorted_without_regard_to_case() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.MP3");
        touch(dir.path(), "A.ogg");
        touch(dir.path(), "cover.jpg");

        let found = scan_dir(dir.path(), &LibrarySettings::default());
        assert_eq!(names(&found), vec!["A.ogg", "b.MP3"]);
    }

    #[test]
    fn hidden_files_and_folders_are_opt_in() {
        let dir = tempdir().unwrap();
        touch(dir.path(), ".secret.mp3");
        touch(dir.path(), ".cache/inside.mp3");
        touch(dir.path(), "shown.mp3");

        let found = scan_dir(dir.path(), &LibrarySettings::default());
        assert_eq!(names(&found), vec!["shown.mp3"]);

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_dir(dir.path(), &settings).len(), 3);
    }

    #[test]
    fn flat_scan_ignores_subfolders() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "top.wav");
        touch(dir.path(), "disc2/deep.wav");

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(names(&scan_dir(dir.path(), &settings)), vec!["top.wav"]);
    }

    #[test]
    fn max_depth_limits_recursion() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "0.mp3");
        touch(dir.path(), "a/1.mp3");
        touch(dir.path(), "a/b/2.mp3");

        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        assert_eq!(names(&scan_dir(dir.path(), &settings)), vec!["0.mp3", "1.mp3"]);
        assert_eq!(scan_dir(dir.path(), &LibrarySettings::default()).len(), 3);
    }

    #[test]
    fn expand_paths_keeps_files_verbatim_and_expands_dirs_in_order() {
        let dir = tempdir().unwrap();
        let picked = touch(dir.path(), "notes.txt");
        let second = touch(dir.path(), "album/02.flac");
        let first = touch(dir.path(), "album/01.flac");

        let inputs = [
            picked.to_string_lossy().into_owned(),
            "   ".to_string(),
            dir.path().join("missing.mp3").to_string_lossy().into_owned(),
            dir.path().join("album").to_string_lossy().into_owned(),
        ];
        let paths = expand_paths(&inputs, &LibrarySettings::default());

        assert_eq!(paths, vec![picked, first, second]);
    }

    #[test]
    fn expand_paths_of_nothing_is_empty() {
        let none: [&str; 0] = [];
        assert!(expand_paths(none, &LibrarySettings::default()).is_empty());
    }
}
