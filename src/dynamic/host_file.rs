//! File-backed dynamic columns
//!
//! A [`DynamicHostFileColumn`] creates columns that expose a file stored
//! below a per-host directory:
//!
//! ```text
//! <basepath>/<host name>/<arguments>
//! ```
//!
//! The basepath is read from the provider on every evaluation, the host is
//! found by resolving the registered owner chain from the current row, and
//! the arguments come from the column reference in the query. Arguments are
//! untrusted: anything that is not a plain relative path is refused when the
//! column is created, and the composed path is checked again after symlinks
//! are resolved.

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::column::{ColumnType, Value};
use crate::config::BasepathProvider;
use crate::relation::{resolve_host, OwnerChain, RowRef};

/// What a file column reports about its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAttribute {
    /// File content, decoded as UTF-8 (lossy)
    Content,
    /// 1 if the file exists, 0 otherwise
    Exists,
    /// Size in bytes
    Size,
    /// Last modification time
    Mtime,
}

impl FileAttribute {
    pub fn column_type(&self) -> ColumnType {
        match self {
            FileAttribute::Content => ColumnType::String,
            FileAttribute::Exists | FileAttribute::Size => ColumnType::Int,
            FileAttribute::Mtime => ColumnType::Time,
        }
    }
}

#[derive(Debug)]
struct Registration {
    name: String,
    description: String,
    chain: OwnerChain,
    basepath: Arc<dyn BasepathProvider>,
    attribute: FileAttribute,
    max_file_size: u64,
}

/// Factory for [`HostFileColumn`]s
#[derive(Debug, Clone)]
pub struct DynamicHostFileColumn {
    registration: Arc<Registration>,
}

impl DynamicHostFileColumn {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        chain: OwnerChain,
        basepath: Arc<dyn BasepathProvider>,
        attribute: FileAttribute,
        max_file_size: u64,
    ) -> Self {
        Self {
            registration: Arc::new(Registration {
                name: name.into(),
                description: description.into(),
                chain,
                basepath,
                attribute,
                max_file_size,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.registration.name
    }

    pub fn description(&self) -> &str {
        &self.registration.description
    }

    pub fn attribute(&self) -> FileAttribute {
        self.registration.attribute
    }

    pub fn column_type(&self) -> ColumnType {
        self.registration.attribute.column_type()
    }

    /// Current root directory, as reported by the provider
    pub fn basepath(&self) -> PathBuf {
        self.registration.basepath.basepath()
    }

    /// Build a column for `arguments`, a path relative to the host directory
    ///
    /// Never fails. Unusable arguments produce a column that always
    /// evaluates to the empty value.
    pub fn create_column(&self, name: &str, arguments: &str) -> HostFileColumn {
        let relative = match parse_relative_path(arguments) {
            Ok(path) => Some(path),
            Err(reason) => {
                tracing::warn!(
                    column = %self.registration.name,
                    arguments,
                    reason,
                    "invalid host file arguments"
                );
                None
            }
        };

        HostFileColumn {
            name: name.to_string(),
            registration: Arc::clone(&self.registration),
            relative,
        }
    }
}

/// Column bound to one file path below each host's directory
#[derive(Debug, Clone)]
pub struct HostFileColumn {
    name: String,
    registration: Arc<Registration>,
    relative: Option<PathBuf>,
}

impl HostFileColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.registration.description
    }

    pub fn column_type(&self) -> ColumnType {
        self.registration.attribute.column_type()
    }

    /// The relative path accepted at creation, if any
    pub fn relative_path(&self) -> Option<&Path> {
        self.relative.as_deref()
    }

    pub fn evaluate(&self, row: RowRef<'_>) -> Value {
        let empty = self.column_type().empty_value();

        let Some(path) = self.locate(row) else {
            return empty;
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                tracing::debug!(path = %path.display(), "not a regular file");
                return empty;
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot stat host file");
                return empty;
            }
        };

        match self.registration.attribute {
            FileAttribute::Exists => Value::Int(1),
            FileAttribute::Size => Value::Int(i64::try_from(metadata.len()).unwrap_or(i64::MAX)),
            FileAttribute::Mtime => metadata
                .modified()
                .map(|t| Value::Time(DateTime::<Utc>::from(t)))
                .unwrap_or(empty),
            FileAttribute::Content => self.read_content(&path).map(Value::Text).unwrap_or(empty),
        }
    }

    /// Compose and check the file path for `row`
    ///
    /// Returns the canonical path, which is guaranteed to lie below
    /// `<basepath>/<host name>`.
    pub fn locate(&self, row: RowRef<'_>) -> Option<PathBuf> {
        let relative = self.relative.as_ref()?;

        let Some(host) = resolve_host(row, &self.registration.chain) else {
            tracing::trace!(column = %self.name, ?row, "row has no owning host");
            return None;
        };

        if !is_single_component(&host.name) {
            tracing::warn!(host = %host.name, "host name is not usable as a directory name");
            return None;
        }

        let host_dir = self.registration.basepath.basepath().join(&host.name);
        let host_dir = match host_dir.canonicalize() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!(dir = %host_dir.display(), error = %e, "host directory unavailable");
                return None;
            }
        };

        let candidate = host_dir.join(relative);
        let resolved = match candidate.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(path = %candidate.display(), error = %e, "host file unavailable");
                return None;
            }
        };

        if !resolved.starts_with(&host_dir) {
            tracing::warn!(
                path = %candidate.display(),
                resolved = %resolved.display(),
                "host file resolves outside its host directory"
            );
            return None;
        }

        Some(resolved)
    }

    fn read_content(&self, path: &Path) -> Option<String> {
        let file = match open_nonblocking(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot open host file");
                return None;
            }
        };

        // The path may have been replaced since it was checked.
        let size = match file.metadata() {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            Ok(_) => {
                tracing::debug!(path = %path.display(), "not a regular file");
                return None;
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot stat host file");
                return None;
            }
        };

        let limit = self.registration.max_file_size;
        if size > limit {
            tracing::warn!(path = %path.display(), size, limit, "host file too large");
            return None;
        }

        // The file may have grown since it was stat'ed.
        let mut buffer = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        if let Err(e) = file.take(limit.saturating_add(1)).read_to_end(&mut buffer) {
            tracing::debug!(path = %path.display(), error = %e, "cannot read host file");
            return None;
        }
        if buffer.len() as u64 > limit {
            tracing::warn!(path = %path.display(), limit, "host file too large");
            return None;
        }

        Some(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Open for reading without waiting on FIFOs or devices
fn open_nonblocking(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NONBLOCK);
    }
    options.open(path)
}

/// Accept only non-empty relative paths made of plain components
fn parse_relative_path(arguments: &str) -> std::result::Result<PathBuf, &'static str> {
    if arguments.is_empty() {
        return Err("missing file name");
    }
    if arguments.contains('\0') {
        return Err("file name contains a NUL byte");
    }
    // `components()` drops interior `.`, so check the raw segments.
    if arguments.split('/').any(|part| part == ".") {
        return Err("file name must not contain '.'");
    }

    let mut path = PathBuf::new();
    for component in Path::new(arguments).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::ParentDir => return Err("file name must not contain '..'"),
            Component::CurDir => return Err("file name must not contain '.'"),
            Component::RootDir | Component::Prefix(_) => {
                return Err("file name must be a relative path")
            }
        }
    }

    if path.as_os_str().is_empty() {
        return Err("missing file name");
    }
    Ok(path)
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == OsStr::new(name)
    )
}
