use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::domain::InputFormatError;
use crate::infrastructure::LoggerTrait;

/// 输入无效时输出的提示
pub const ERROR_SIGNAL: &str = "ERROR";

/// 读取一行，去掉行尾的 `\n` 或 `\r\n`；输入结束时返回 `None`
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("无法读取输入")?;
    if read == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// 反复读取输入直到解析成功，每次失败输出 `ERROR`
pub fn prompt_until_valid<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    logger: &dyn LoggerTrait,
    parse: F,
) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, InputFormatError>,
{
    loop {
        let Some(line) = read_line(input)? else {
            bail!("输入意外结束");
        };

        match parse(&line) {
            Ok(value) => {
                logger.log_message(&format!("输入已接受: {:?}", line))?;
                return Ok(value);
            }
            Err(err) => {
                logger.log_message(&format!("输入无效: {}", err))?;
                writeln!(output, "{}", ERROR_SIGNAL)?;
                output.flush()?;
            }
        }
    }
}
