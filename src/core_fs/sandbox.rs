//! Maps client paths onto the sandbox root.
//!
//! Every filesystem-touching command resolves its argument here first. A
//! failed resolution carries the root itself, never a path outside it.

use log::warn;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    path: PathBuf,
    ok: bool,
}

impl Resolved {
    fn confined(path: PathBuf) -> Self {
        Self { path, ok: true }
    }

    fn rejected(root: &Path) -> Self {
        Self {
            path: root.to_path_buf(),
            ok: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// The resolved path, or the root when resolution failed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.ok.then_some(self.path)
    }
}

fn is_confined(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

/// Resolves `path` (absolute, or relative to `working_dir`) under `root`.
///
/// `root` must already be canonical. With `allow_missing_leaf` only the
/// directory part has to exist; the final component is appended to the
/// canonical directory without being canonicalized itself.
pub async fn resolve(
    root: &Path,
    working_dir: &str,
    path: &str,
    allow_missing_leaf: bool,
) -> Resolved {
    let (dir, leaf) = if allow_missing_leaf {
        match path.rfind('/') {
            Some(pos) => (&path[..pos], Some(&path[pos + 1..])),
            None => ("", Some(path)),
        }
    } else {
        (path, None)
    };

    if let Some(leaf) = leaf {
        if leaf.is_empty() || leaf == "." || leaf == ".." {
            return Resolved::rejected(root);
        }
    }

    let mut candidate = root.to_path_buf();
    if !path.starts_with('/') {
        candidate.extend(working_dir.split('/').filter(|c| !c.is_empty()));
    }
    candidate.extend(dir.split('/').filter(|c| !c.is_empty()));

    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(canonical) => canonical,
        Err(_) => return Resolved::rejected(root),
    };
    if !is_confined(root, &canonical) {
        warn!(
            "Rejected path escaping the sandbox: {:?} -> {:?}",
            path, canonical
        );
        return Resolved::rejected(root);
    }

    let Some(leaf) = leaf else {
        return Resolved::confined(canonical);
    };
    let joined = canonical.join(leaf);

    // An existing symlink leaf must not point out of the sandbox either.
    if let Ok(meta) = tokio::fs::symlink_metadata(&joined).await {
        if meta.file_type().is_symlink() {
            match tokio::fs::canonicalize(&joined).await {
                Ok(target) if is_confined(root, &target) => {}
                _ => {
                    warn!("Rejected symlink leaving the sandbox: {:?}", joined);
                    return Resolved::rejected(root);
                }
            }
        }
    }
    Resolved::confined(joined)
}

/// Client-visible form of a confined path: `/` followed by the part below
/// the root.
pub fn client_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(Path::new(""));
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", parts.join("/"))
}
