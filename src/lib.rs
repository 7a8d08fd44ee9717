// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{ActionSpec, FileEntry, InputFormatError, PipelineError, SearchRoot, SearchSpec};
pub use application::{run_session, Config, SessionOptions};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::SearchSummary;
