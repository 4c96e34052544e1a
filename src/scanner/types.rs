use std::collections::HashMap;
use std::path::PathBuf;

/// A retained file queued for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub path: PathBuf,
    /// Final dotted suffix including the dot, `""` when the file has none.
    pub extension: String,
}

/// Outcome of walking one extraction root.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Files that survived directory pruning and extension filtering.
    pub files: Vec<WorkItem>,
    /// How often each retained directory name was seen below the root.
    pub directories: HashMap<String, usize>,
}
