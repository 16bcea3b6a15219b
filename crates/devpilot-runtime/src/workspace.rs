//! Filesystem workspace rooted at a project directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use devpilot_core::{SearchHit, SearchQuery, Workspace, WorkspaceError};
use regex::{Regex, RegexBuilder};
use tokio::fs;
use tracing::{debug, trace};

/// Hits returned when the query sets no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 8000;

/// [`Workspace`] over the local filesystem.
///
/// Every path is checked twice: lexically by [`resolve`](Self::resolve),
/// then against the canonical root once symlinks are followed.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
    canonical_root: PathBuf,
    default_limit: usize,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let canonical_root = std::fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        Self {
            root,
            canonical_root,
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the root without touching the filesystem.
    ///
    /// `..` is applied lexically; any path that ends up above the root is
    /// rejected.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, WorkspaceError> {
        let requested = Path::new(path.trim());
        let relative = if requested.is_absolute() {
            requested
                .strip_prefix(&self.root)
                .map_err(|_| WorkspaceError::OutsideRoot(path.to_string()))?
        } else {
            requested
        };

        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir if depth > 0 => {
                    resolved.pop();
                    depth -= 1;
                }
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(WorkspaceError::OutsideRoot(path.to_string()));
                }
            }
        }
        Ok(resolved)
    }

    /// Resolve `path` and make sure following symlinks keeps it inside
    /// the root.
    ///
    /// The deepest existing ancestor is canonicalized, so paths that do
    /// not exist yet (write targets) are checked through their parent.
    /// A dangling symlink is rejected since its target cannot be checked.
    async fn confine(&self, path: &str) -> Result<PathBuf, WorkspaceError> {
        let resolved = self.resolve(path)?;
        let outside = || WorkspaceError::OutsideRoot(path.to_string());

        let mut probe = resolved.as_path();
        loop {
            match fs::canonicalize(probe).await {
                Ok(real) if real.starts_with(&self.canonical_root) => return Ok(resolved),
                Ok(real) => {
                    debug!(path, target = %real.display(), "Rejected path outside workspace");
                    return Err(outside());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    if fs::symlink_metadata(probe).await.is_ok() {
                        return Err(outside());
                    }
                    probe = probe.parent().ok_or_else(outside)?;
                }
                Err(e) => return Err(io_error(path, &e)),
            }
        }
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    async fn search_file(
        &self,
        path: &Path,
        matcher: &Regex,
        limit: usize,
        hits: &mut Vec<SearchHit>,
    ) -> Result<(), WorkspaceError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(path = %path.display(), error = %e, "Skipping unreadable file");
                return Ok(());
            }
        };
        if bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0) {
            return Ok(());
        }
        let Ok(text) = String::from_utf8(bytes) else {
            return Ok(());
        };

        for (index, line) in text.lines().enumerate() {
            if hits.len() >= limit {
                break;
            }
            if matcher.is_match(line) {
                hits.push(SearchHit {
                    path: self.display_path(path),
                    line: index + 1,
                    text: line.trim().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Workspace for FsWorkspace {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, WorkspaceError> {
        let pattern = query.pattern.trim();
        if pattern.is_empty() {
            return Err(WorkspaceError::InvalidPattern("empty search pattern".into()));
        }
        let matcher = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| WorkspaceError::InvalidPattern(e.to_string()))?;

        let start = match query.path.as_deref() {
            Some(path) => self.confine(path).await?,
            None => self.root.clone(),
        };
        let limit = query.limit.unwrap_or(self.default_limit);
        let mut hits = Vec::new();

        let metadata = fs::metadata(&start)
            .await
            .map_err(|e| io_error(&self.display_path(&start), &e))?;
        if metadata.is_file() {
            self.search_file(&start, &matcher, limit, &mut hits).await?;
            return Ok(hits);
        }

        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            if hits.len() >= limit {
                break;
            }

            let mut entries = Vec::new();
            let mut reader = fs::read_dir(&dir)
                .await
                .map_err(|e| io_error(&self.display_path(&dir), &e))?;
            while let Some(entry) = reader
                .next_entry()
                .await
                .map_err(|e| io_error(&self.display_path(&dir), &e))?
            {
                entries.push(entry);
            }
            entries.sort_by_key(tokio::fs::DirEntry::file_name);

            let mut subdirs = Vec::new();
            for entry in entries {
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                let path = entry.path();
                if file_type.is_dir() {
                    let skipped = entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name));
                    if !skipped {
                        subdirs.push(path);
                    }
                } else if file_type.is_file() {
                    self.search_file(&path, &matcher, limit, &mut hits).await?;
                    if hits.len() >= limit {
                        break;
                    }
                }
            }
            // Reversed so the stack pops them alphabetically
            pending.extend(subdirs.into_iter().rev());
        }

        debug!(pattern, hits = hits.len(), limit, "Search finished");
        Ok(hits)
    }

    async fn read(&self, path: &str) -> Result<String, WorkspaceError> {
        let resolved = self.confine(path).await?;
        fs::read_to_string(&resolved)
            .await
            .map_err(|e| io_error(path, &e))
    }

    async fn write(&self, path: &str, content: &str) -> Result<u64, WorkspaceError> {
        let resolved = self.confine(path).await?;
        if resolved == self.root {
            return Err(WorkspaceError::Io {
                path: path.to_string(),
                reason: "cannot write to the workspace root".into(),
            });
        }
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(path, &e))?;
        }
        fs::write(&resolved, content)
            .await
            .map_err(|e| io_error(path, &e))?;

        debug!(path, bytes = content.len(), "Wrote file");
        Ok(u64::try_from(content.len()).unwrap_or(u64::MAX))
    }
}

fn io_error(path: &str, err: &std::io::Error) -> WorkspaceError {
    if err.kind() == ErrorKind::NotFound {
        WorkspaceError::NotFound(path.to_string())
    } else {
        WorkspaceError::Io {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}
