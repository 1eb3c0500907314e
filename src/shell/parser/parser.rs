use thiserror::Error;

use super::ast::{Command, Stream};
use super::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    EmptyCommand,
    #[error("missing command name")]
    MissingCommandName,
    #[error("{0} redirection without file name")]
    DanglingRedirection(Stream),
    #[error("multiple redirection of {0}")]
    DuplicateRedirection(Stream),
    #[error("{0} redirection without file name")]
    AdjacentRedirectionOperators(Stream),
}

/// 校验 token 序列并构造 [`Command`]
///
/// 校验顺序固定：空行、开头的操作符、结尾的操作符、重复的操作符。
/// 之后才取出重定向，剩下的 token 组成 `argv`。
pub fn build(tokens: Vec<Token>) -> Result<Command, ParseError> {
    let (first, last) = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ParseError::EmptyCommand),
    };
    if first.is_special() {
        return Err(ParseError::MissingCommandName);
    }
    if let Some(stream) = last.stream() {
        return Err(ParseError::DanglingRedirection(stream));
    }
    for stream in [Stream::Stdin, Stream::Stdout] {
        let count = tokens.iter().filter(|t| t.stream() == Some(stream)).count();
        if count > 1 {
            return Err(ParseError::DuplicateRedirection(stream));
        }
    }

    let mut argv = Vec::with_capacity(tokens.len());
    let mut stdin = None;
    let mut stdout = None;

    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        let Some(stream) = token.stream() else {
            argv.push(token.into_text());
            continue;
        };
        // 结尾检查保证了后面还有 token
        let target = tokens
            .next()
            .ok_or(ParseError::DanglingRedirection(stream))?;
        if target.is_special() {
            return Err(ParseError::AdjacentRedirectionOperators(stream));
        }
        match stream {
            Stream::Stdin => stdin = Some(target.into_text()),
            Stream::Stdout => stdout = Some(target.into_text()),
        }
    }

    Ok(Command {
        argv,
        stdin,
        stdout,
    })
}
