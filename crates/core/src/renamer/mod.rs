//! Renamer module for moving files to their tag-derived names.
//!
//! [`SafeRenamer`] never replaces an existing file. Before renaming it takes
//! an advisory lock keyed on the destination (a `<name>.lock` marker next to
//! it), so renamers in different tasks or processes that compute the same
//! destination are serialized and only the first one wins.
//!
//! # Example
//!
//! ```ignore
//! use tagtoname_core::renamer::{RenamerConfig, SafeRenamer, RenameStatus};
//!
//! let renamer = SafeRenamer::new(RenamerConfig::default());
//! match renamer.rename(&old, &new).await? {
//!     RenameStatus::Renamed(path) => println!("{}", path.display()),
//!     RenameStatus::Unchanged(path) => println!("{} unchanged", path.display()),
//! }
//! ```

mod config;
mod error;
mod lock;
mod safe_rename;

pub use config::{LockConfig, RenamerConfig};
pub use error::{LockError, RenameError};
pub use lock::{lock_path_for, AdvisoryLock, LockHandle, MarkerFileLock};
pub use safe_rename::{RenameStatus, SafeRenamer};
