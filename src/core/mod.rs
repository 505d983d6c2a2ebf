pub mod bookmarks;
pub mod explain;
pub mod mailbox;
#[cfg(unix)]
pub mod pty;

pub use crate::domain::model::{Bookmark, TrimReport, WrapOutcome};
pub use crate::domain::ports::{Launcher, TitleFetcher};
pub use crate::utils::error::Result;
