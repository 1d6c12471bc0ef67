use std::path::{Component, Path, PathBuf};

/// Display form of a path for log and error messages: canonical when the
/// path exists, otherwise absolute with `.` and `..` folded lexically.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }
        let absolute = std::path::absolute(self).unwrap_or_else(|_| self.to_path_buf());
        fold_components(&absolute).display().to_string()
    }
}

fn fold_components(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut kept, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(kept.last(), Some(Component::Normal(_))) {
                        kept.pop();
                    }
                }
                other => kept.push(other),
            }
            kept
        })
        .iter()
        .collect()
}
