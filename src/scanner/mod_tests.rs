use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn file_names(result: &ScanResult) -> Vec<String> {
    let mut names: Vec<String> = result
        .files
        .iter()
        .map(|item| item.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn scan_empty_directory() {
    let dir = TempDir::new().unwrap();
    let rules = ExclusionRules::defaults();
    let result = DirectoryScanner::new(&rules).scan(dir.path());
    assert!(result.files.is_empty());
    assert!(result.directories.is_empty());
}

#[test]
fn scan_records_extensions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", "print(1)\n");
    write(dir.path(), "Makefile", "all:\n");

    let rules = ExclusionRules::default();
    let result = DirectoryScanner::new(&rules).scan(dir.path());

    let mut extensions: Vec<_> = result.files.iter().map(|f| f.extension.as_str()).collect();
    extensions.sort_unstable();
    assert_eq!(extensions, vec!["", ".py"]);
}

#[test]
fn excluded_directories_are_pruned() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/app.js", "x\n");
    write(dir.path(), "node_modules/pkg/index.js", "x\n");
    write(dir.path(), "src/node_modules/deep/lib.js", "x\n");

    let rules = ExclusionRules::new(["node_modules"], Vec::<String>::new());
    let result = DirectoryScanner::new(&rules).scan(dir.path());

    assert_eq!(file_names(&result), vec!["app.js"]);
    assert!(!result.directories.contains_key("node_modules"));
    assert!(!result.directories.contains_key("pkg"));
}

#[cfg(unix)]
#[test]
fn pruned_directories_are_never_read() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep/a.rs", "fn a() {}\n");
    write(dir.path(), "locked/b.rs", "fn b() {}\n");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let rules = ExclusionRules::new(["locked"], Vec::<String>::new());
    let result = DirectoryScanner::new(&rules).scan(dir.path());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(file_names(&result), vec!["a.rs"]);
}

#[test]
fn excluded_extensions_are_dropped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "logo.png", "binary");
    write(dir.path(), "vendor.min.js", "minified");
    write(dir.path(), "app.js", "code");

    let rules = ExclusionRules::defaults();
    let result = DirectoryScanner::new(&rules).scan(dir.path());
    assert_eq!(file_names(&result), vec!["app.js"]);
}

#[test]
fn root_directory_name_is_not_matched() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("build");
    write(&root, "main.c", "int main;\n");

    let rules = ExclusionRules::new(["build"], Vec::<String>::new());
    let result = DirectoryScanner::new(&rules).scan(&root);
    assert_eq!(file_names(&result), vec!["main.c"]);
}

#[test]
fn retained_directory_names_are_tallied() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/src/x.rs", "x\n");
    write(dir.path(), "b/src/y.rs", "y\n");
    write(dir.path(), "dist/z.rs", "z\n");

    let rules = ExclusionRules::new(["dist"], Vec::<String>::new());
    let result = DirectoryScanner::new(&rules).scan(dir.path());

    assert_eq!(result.directories.get("src"), Some(&2));
    assert_eq!(result.directories.get("a"), Some(&1));
    assert_eq!(result.directories.get("dist"), None);
}
