pub mod action;
pub mod error;
pub mod file_entry;
pub mod file_walker;
pub mod grammar;
pub mod search;

pub use action::act;
pub use error::{InputFormatError, PipelineError};
pub use file_entry::{FileEntry, TextContent};
pub use file_walker::{list_files, list_files_with_progress};
pub use grammar::{ActionSpec, SearchRoot, SearchSpec};
pub use search::search;
