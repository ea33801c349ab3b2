use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// 元数据文件读写失败；内存中的表仍然正确
    Storage { path: PathBuf, message: String },
    NotSplit(PathBuf),
    PartRead { path: PathBuf, message: String },
    PartWrite { path: PathBuf, message: String },
    OutputExists(PathBuf),
    UnsupportedFileType(String),
    Launch { program: String, message: String },
    AmbiguousOwner { part: PathBuf, owners: Vec<PathBuf> },
    /// 分片路径已登记在另一个原始文件名下（例如同名不同后缀）
    PartOwned { part: PathBuf, owner: PathBuf },
    NoParts(PathBuf),
    EmptyInput(PathBuf),
    InvalidMaxLines(usize),
}

impl SplitError {
    pub fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SplitError::Storage {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn part_read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SplitError::PartRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn part_write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SplitError::PartWrite {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::Storage { path, message } => {
                write!(f, "Failed to persist split metadata {}: {}", path.display(), message)
            }
            SplitError::NotSplit(path) => {
                write!(f, "No split files found for {}", path.display())
            }
            SplitError::PartRead { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            SplitError::PartWrite { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
            SplitError::OutputExists(path) => {
                write!(f, "Refusing to overwrite existing file {}", path.display())
            }
            SplitError::UnsupportedFileType(ext) => {
                if ext.is_empty() {
                    write!(f, "Unsupported file type: (no extension)")
                } else {
                    write!(f, "Unsupported file type: {}", ext)
                }
            }
            SplitError::Launch { program, message } => {
                write!(f, "Failed to launch {}: {}", program, message)
            }
            SplitError::AmbiguousOwner { part, owners } => {
                let owners = owners
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{} is registered under several originals: {}", part.display(), owners)
            }
            SplitError::PartOwned { part, owner } => write!(
                f,
                "{} already belongs to the split of {}",
                part.display(),
                owner.display()
            ),
            SplitError::NoParts(path) => {
                write!(f, "Split of {} has no parts", path.display())
            }
            SplitError::EmptyInput(path) => {
                write!(f, "Nothing to split: {} is empty", path.display())
            }
            SplitError::InvalidMaxLines(n) => {
                write!(f, "maxLinesPerFile must be a positive integer, got {}", n)
            }
        }
    }
}

impl std::error::Error for SplitError {}
