pub mod display;
pub mod prompt;

pub use display::{format_duration, format_file_size, print_paths, SearchSummary};
pub use prompt::{prompt_until_valid, read_line, ERROR_SIGNAL};
