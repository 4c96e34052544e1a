use std::path::Path;

use indexmap::IndexSet;

/// Directory names pruned from every walk unless the caller replaces the defaults.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    // Build output and dependency trees
    "node_modules", "dist", "build", "target", "out", "compiled", "__generated__", "vendor",
    // VCS and editor state
    ".git", ".svn", ".hg", ".idea", ".vscode", ".DS_Store",
    // Tool caches
    "__pycache__", "venv", "env", ".next", ".nuxt", ".terraform", ".gradle", ".pytest_cache",
    "coverage", ".cache", ".expo", ".vercel", ".parcel-cache", ".webpack-cache",
    ".storybook-static",
    // Logs and scratch
    "logs", "temp", "tmp", "docs",
    // Static and media assets
    "static", "media", "assets", "public", "resources", "upload", "downloads", "images", "fonts",
    "icons", "videos",
    // Framework state
    "storage", "migrations", ".env_backup", "contrib",
    // Database dumps and uploads
    "db_data", "database", "dump", "backups", "uploads", "temp_uploads", "tmp_uploads",
];

/// File extensions skipped before any read unless the caller replaces the defaults.
pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    // Media and documents
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".mp3", ".mp4", ".avi", ".mov", ".pdf",
    // Archives and binaries
    ".zip", ".tar", ".gz", ".rar", ".7z", ".exe", ".dll", ".class", ".jar", ".war", ".iso",
    ".out", ".app", ".dmg", ".pkg", ".deb", ".rpm", ".msi", ".apk",
    // Logs, swap and lock files
    ".log", ".swp", ".iml", ".lock", ".bak",
    // Configuration
    ".json", ".yaml", ".yml", ".toml", ".ini", ".properties", ".env", ".cfg", ".config",
    // Databases
    ".sqlite", ".db", ".sql", ".sqlite3", ".db-journal", ".psql", ".db-shm", ".db-wal",
    // Minified and bundled web assets
    ".min.js", ".min.css", ".bundle.js", ".map",
    // Certificates and runtime files
    ".crt", ".pem", ".key", ".pid", ".sock", ".manifest",
];

/// Directory-name and extension deny-lists for one analysis run.
///
/// Membership is a case-sensitive exact match. Directory names are compared
/// against the final path segment only; extensions include the leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    dirs: IndexSet<String>,
    extensions: IndexSet<String>,
}

impl ExclusionRules {
    #[must_use]
    pub fn new<D, E>(dirs: D, extensions: E) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in deny-lists covering build artifacts, dependencies, media and config files.
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(
            DEFAULT_IGNORE_DIRS.iter().copied(),
            DEFAULT_IGNORE_EXTENSIONS.iter().copied(),
        )
    }

    /// Add directory names and extensions to the existing deny-lists.
    #[must_use]
    pub fn extended<D, E>(mut self, dirs: D, extensions: E) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
        self.extensions.extend(extensions.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    #[must_use]
    pub fn is_excluded_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Whether a file name is denied by its final suffix or its two-segment
    /// compound suffix (`jquery.min.js` checks `.js` and `.min.js`).
    #[must_use]
    pub fn is_excluded_file(&self, file_name: &str) -> bool {
        let extension = extension_of(file_name);
        if !extension.is_empty() && self.is_excluded_extension(extension) {
            return true;
        }
        compound_extension_of(file_name).is_some_and(|compound| self.is_excluded_extension(compound))
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// Final dotted suffix of a file name including the dot, or `""`.
///
/// Leading-dot names such as `.gitignore` have no extension.
#[must_use]
pub fn extension_of(file_name: &str) -> &str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or("", |ext| &file_name[file_name.len() - ext.len() - 1..])
}

/// Last two dotted segments of a file name (`a.min.js` → `.min.js`).
///
/// Returns `None` unless the stem before the compound suffix is non-empty.
#[must_use]
pub fn compound_extension_of(file_name: &str) -> Option<&str> {
    let last = file_name.rfind('.')?;
    let second = file_name[..last].rfind('.')?;
    if second == 0 || last == second + 1 || last + 1 == file_name.len() {
        return None;
    }
    Some(&file_name[second..])
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
