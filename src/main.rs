use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use file_finder::{run_session, Config, ErrorLogger, Logger, LoggerTrait, PipelineError, SessionOptions};

/// 交互式文件查找工具：列出目录、按条件搜索、对匹配文件执行操作
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 启用会话日志和错误日志
    #[clap(long)]
    log: bool,

    /// 日志文件目录
    #[clap(long)]
    log_dir: Option<PathBuf>,

    /// 配置文件路径 (TOML)
    #[clap(long)]
    config: Option<PathBuf>,

    /// 结束时在标准错误输出摘要
    #[clap(long)]
    summary: bool,

    /// 遍历时在标准错误显示进度
    #[clap(long)]
    progress: bool,

    /// 输出默认配置后退出
    #[clap(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    // 加载配置，命令行参数优先
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.logging.enabled |= args.log;
    config.display.show_summary |= args.summary;
    config.display.show_progress |= args.progress;
    if let Some(dir) = &args.log_dir {
        config.logging.directory = dir.display().to_string();
    }
    config.validate()?;

    let log_dir = config.log_dir();
    let logger = Logger::new(config.logging.enabled, &log_dir)?;
    let error_logger = ErrorLogger::new(config.logging.enabled, &log_dir)?;

    let options = SessionOptions {
        show_progress: config.display.show_progress,
    };

    let start_time = Instant::now();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = BufWriter::new(io::stdout().lock());
    let result = run_session(&mut input, &mut output, &logger, options);
    drop(output);

    match result {
        Ok(summary) => {
            logger.finalize(summary.listed_files, summary.matched_files, start_time.elapsed())?;
            error_logger.finalize()?;
            if config.display.show_summary {
                summary.print(&mut io::stderr().lock())?;
            }
            Ok(())
        }
        Err(err) => {
            // 文件系统错误写入错误日志
            if let Some(pipeline_err) = err.downcast_ref::<PipelineError>() {
                let details = format!("{:#}", err);
                error_logger.log_error(
                    pipeline_err.error_type(),
                    pipeline_err.path(),
                    &pipeline_err.to_string(),
                    Some(&details),
                )?;
            }
            logger.log_message(&format!("运行终止: {:#}", err))?;
            error_logger.finalize()?;
            error_logger.print_error_summary();
            Err(err)
        }
    }
}
