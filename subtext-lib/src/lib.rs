pub(crate) mod api;
pub(crate) mod error;
pub mod select;
pub mod source;
pub mod subtitle;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use api::*;
pub use error::{ErrorKind, Result, SourceError, SubtitleError};
pub use source::{SubtitleSource, YtDlpSource};
pub use types::*;
