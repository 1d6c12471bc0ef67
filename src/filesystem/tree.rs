use std::collections::HashMap;

use tracing::debug;

/// A single entry of a [`PathTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    File,
    Folder { children: HashMap<String, PathNode> },
}

impl PathNode {
    pub fn is_folder(&self) -> bool {
        matches!(self, PathNode::Folder { .. })
    }

    pub fn children(&self) -> Option<&HashMap<String, PathNode>> {
        match self {
            PathNode::Folder { children } => Some(children),
            PathNode::File => None,
        }
    }

    /// Splits one level into folders and files, each sorted by name.
    pub fn partition(
        children: &HashMap<String, PathNode>,
    ) -> (Vec<(&str, &HashMap<String, PathNode>)>, Vec<&str>) {
        let mut folders = Vec::new();
        let mut files = Vec::new();
        for (name, node) in children {
            match node {
                PathNode::Folder { children } => folders.push((name.as_str(), children)),
                PathNode::File => files.push(name.as_str()),
            }
        }
        folders.sort_unstable_by(|a, b| a.0.cmp(b.0));
        files.sort_unstable();
        (folders, files)
    }

    /// Children of this node, turning a file into an empty folder first.
    fn promote_to_folder(&mut self) -> &mut HashMap<String, PathNode> {
        // At most two passes: a file is replaced, then matched as a folder.
        loop {
            match self {
                PathNode::Folder { children } => return children,
                PathNode::File => {
                    *self = PathNode::Folder {
                        children: HashMap::new(),
                    }
                }
            }
        }
    }

    fn count(&self) -> (usize, usize) {
        match self {
            PathNode::File => (0, 1),
            PathNode::Folder { children } => children.values().fold((1, 0), |acc, node| {
                let (folders, files) = node.count();
                (acc.0 + folders, acc.1 + files)
            }),
        }
    }
}

/// Folder/file structure derived from a newline separated path listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathTree {
    root: HashMap<String, PathNode>,
}

impl PathTree {
    pub fn parse(listing: &str) -> Self {
        let tree = listing
            .trim()
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .fold(Self::default(), |mut tree, line| {
                tree.insert_line(line);
                tree
            });
        debug!(
            "Parsed listing into {} folders and {} files",
            tree.folder_count(),
            tree.file_count()
        );
        tree
    }

    /// Inserts one path. When a name is used both as a file and as a folder
    /// on the same level, the folder wins regardless of order.
    pub fn insert_line(&mut self, line: &str) {
        let mut segments = split_segments(line).peekable();
        let mut current = &mut self.root;

        while let Some(name) = segments.next() {
            if segments.peek().is_none() {
                current.entry(name.to_string()).or_insert(PathNode::File);
                break;
            }

            let node = current
                .entry(name.to_string())
                .or_insert_with(|| PathNode::Folder {
                    children: HashMap::new(),
                });
            current = node.promote_to_folder();
        }
    }

    pub fn root(&self) -> &HashMap<String, PathNode> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn folder_count(&self) -> usize {
        self.counts().0
    }

    pub fn file_count(&self) -> usize {
        self.counts().1
    }

    pub fn node_count(&self) -> usize {
        let (folders, files) = self.counts();
        folders + files
    }

    fn counts(&self) -> (usize, usize) {
        self.root.values().fold((0, 0), |acc, node| {
            let (folders, files) = node.count();
            (acc.0 + folders, acc.1 + files)
        })
    }
}

/// Splits on `/` when the line has one, otherwise on `\`. Empty segments,
/// `.` and anything carrying a drive letter colon are dropped.
fn split_segments(line: &str) -> impl Iterator<Item = &str> {
    let separator = if line.contains('/') { '/' } else { '\\' };
    line.split(separator)
        .filter(|segment| !segment.is_empty() && *segment != "." && !segment.contains(':'))
}
