use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a path pointed to when its handle was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Folder,
    RegularFile,
    /// Nothing there (yet). Missing files are fine to pass around, they
    /// just can't be read.
    Missing,
}

/// A path plus its classification.
///
/// `parent` and `child` are pure path computations; they don't care whether
/// the result exists, they only classify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
    kind: FileKind,
}

impl FileHandle {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => FileKind::Folder,
            Ok(_) => FileKind::RegularFile,
            Err(_) => FileKind::Missing,
        };
        Self { path, kind }
    }

    /// The folder that contains this file.
    pub fn parent(&self) -> FileHandle {
        let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
        FileHandle::at(parent)
    }

    /// The file at `segments` under this folder.
    pub fn child<I, S>(&self, segments: I) -> FileHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut path = self.path.clone();
        for segment in segments {
            path.push(segment);
        }
        FileHandle::at(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as it is written into generated documents.
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn exists(&self) -> bool {
        self.kind != FileKind::Missing
    }
}

impl PartialOrd for FileHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            FileKind::Folder => "Folder",
            FileKind::RegularFile => "File",
            FileKind::Missing => "Missing",
        };
        write!(f, "{}({})", tag, self.path.display())
    }
}
