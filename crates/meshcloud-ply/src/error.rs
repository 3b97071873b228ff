use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure while reading a PLY file.
#[derive(Debug)]
pub enum PlyError {
    Io(io::Error),
    /// The path does not have a `.ply` extension.
    NotPly(PathBuf),
    /// Malformed header line.
    Header {
        /// 1-based header line number.
        line: usize,
        message: String,
    },
    /// Well-formed, but outside what this reader decodes.
    Unsupported(String),
    /// The body ended inside row `row` of element `element`, which declares
    /// `expected` rows.
    UnexpectedEof {
        element: String,
        row: usize,
        expected: usize,
    },
}

impl PlyError {
    pub(crate) fn header(line: usize, message: impl Into<String>) -> Self {
        Self::Header { line, message: message.into() }
    }
}

impl fmt::Display for PlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "ply read failed: {err}"),
            Self::NotPly(path) => write!(f, "{} is not a .ply file", path.display()),
            Self::Header { line, message } => write!(f, "ply header error at line {line}: {message}"),
            Self::Unsupported(what) => write!(f, "unsupported ply content: {what}"),
            Self::UnexpectedEof { element, row, expected } => write!(
                f,
                "ply body ended at {element} {row} of {expected}"
            ),
        }
    }
}

impl std::error::Error for PlyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PlyError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
