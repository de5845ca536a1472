//! Bounded project tree walk shared by the detector channels.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directories and files below a project root, relative to it, in sorted
/// walk order.
#[derive(Debug, Clone, Default)]
pub struct ProjectWalk {
    pub root: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl ProjectWalk {
    /// Walk `root` down to `max_depth`, never entering a directory whose
    /// name is in `skip`.
    pub fn scan(root: &Path, max_depth: usize, skip: &[String]) -> Self {
        let mut walk = Self {
            root: root.to_path_buf(),
            ..Default::default()
        };

        let entries = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && skip.iter().any(|s| e.file_name().to_string_lossy() == s.as_str()))
            });

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable path: {}", e);
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if entry.file_type().is_dir() {
                walk.directories.push(relative.to_path_buf());
            } else if entry.file_type().is_file() {
                walk.files.push(relative.to_path_buf());
            }
        }

        walk
    }

    /// Files whose extension is one of `extensions`, case-insensitively.
    pub fn files_with_extension<'a>(
        &'a self,
        extensions: &'a [String],
    ) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.files
            .iter()
            .filter(move |path| has_extension(path, extensions))
    }
}

/// Lowercased file name of the last path component.
pub fn lower_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}
