//! Where the bytes of a decode call come from.

use std::fmt;
use std::path::PathBuf;

/// The literal source string that selects standard input.
pub const STDIN: &str = "-";

/// The resolved source of one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The process's standard input (or the decoder's injected replacement).
    Stdin,
    /// A path resolved through the decoder's [`FileSystem`](crate::io::fs::FileSystem).
    Remote(String),
    /// A path on the local filesystem.
    Local(PathBuf),
}

impl Source {
    /// Resolve a caller-supplied source string.
    ///
    /// Precedence: the `"-"` sentinel first, then the presence of a remote
    /// filesystem, then a local path.
    ///
    /// ```
    /// use recordcodec::source::Source;
    ///
    /// assert_eq!(Source::resolve("-", true), Source::Stdin);
    /// assert_eq!(Source::resolve("bucket/a.csv", true), Source::Remote("bucket/a.csv".into()));
    /// assert_eq!(Source::resolve("a.csv", false), Source::Local("a.csv".into()));
    /// ```
    pub fn resolve(src: &str, has_filesystem: bool) -> Self {
        if src == STDIN {
            Source::Stdin
        } else if has_filesystem {
            Source::Remote(src.to_string())
        } else {
            Source::Local(PathBuf::from(src))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Stdin => "stdin",
            Source::Remote(_) => "remote",
            Source::Local(_) => "local",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::Remote(path) => write!(f, "remote:{path}"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
