use std::fmt;

use thiserror::Error;

use super::ast::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ordinary,
    Special,
}

/// 命令行中的一个词法单元
///
/// 特殊 token 只有 `<` 和 `>`，其余（包括引号里的 `<`、`>`）都是普通 token。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn ordinary(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Ordinary,
            text: text.into(),
        }
    }

    pub fn special(stream: Stream) -> Self {
        Self {
            kind: TokenKind::Special,
            text: stream.symbol().to_string(),
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_special(&self) -> bool {
        self.kind == TokenKind::Special
    }

    /// 特殊 token 对应的流，普通 token 返回 `None`
    pub fn stream(&self) -> Option<Stream> {
        match self.kind {
            TokenKind::Special => self.text.chars().next().and_then(Stream::from_symbol),
            TokenKind::Ordinary => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TokenKind::Ordinary => "ordinary",
            TokenKind::Special => "special",
        };
        write!(f, "Token: {} ({})", self.text, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unmatched quote")]
    UnmatchedQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Ordinary,
    Special,
    QuoteIn,
    QuoteOut,
}

/// 单行命令的有限状态词法分析器
///
/// 缓冲区和已产生的 token 都归状态机所有，出错时一起丢弃。
pub struct Lexer {
    state: State,
    buffer: String,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new();
        for c in line.chars() {
            lexer.feed(c);
        }
        lexer.finish()
    }

    pub fn feed(&mut self, c: char) {
        self.state = match (self.state, c) {
            (State::QuoteIn, '"') => State::QuoteOut,
            (State::QuoteIn, c) => {
                self.buffer.push(c);
                State::QuoteIn
            }
            (_, '"') => State::QuoteIn,
            (_, '<') => {
                self.flush();
                self.tokens.push(Token::special(Stream::Stdin));
                State::Special
            }
            (_, '>') => {
                self.flush();
                self.tokens.push(Token::special(Stream::Stdout));
                State::Special
            }
            (_, c) if c.is_whitespace() => {
                self.flush();
                State::Start
            }
            (_, c) => {
                self.buffer.push(c);
                State::Ordinary
            }
        };
    }

    /// 行尾：引号未闭合则报错，否则输出最后一个词
    pub fn finish(mut self) -> Result<Vec<Token>, LexError> {
        if self.state == State::QuoteIn {
            return Err(LexError::UnmatchedQuote);
        }
        self.flush();
        Ok(self.tokens)
    }

    // 只输出正在积累的词：`""` 得到空 token，连续空白什么也不产生
    fn flush(&mut self) {
        if matches!(self.state, State::Ordinary | State::QuoteOut) {
            let text = std::mem::take(&mut self.buffer);
            self.tokens.push(Token::ordinary(text));
        }
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ord(text: &str) -> Token {
        Token::ordinary(text)
    }

    fn lt() -> Token {
        Token::special(Stream::Stdin)
    }

    fn gt() -> Token {
        Token::special(Stream::Stdout)
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(tokenize("ls -l"), Ok(vec![ord("ls"), ord("-l")]));
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(tokenize(""), Ok(vec![]));
        assert_eq!(tokenize(" \t  "), Ok(vec![]));
    }

    #[test]
    fn test_redirection_needs_no_whitespace() {
        let expected = vec![ord("a"), lt(), ord("b")];
        assert_eq!(tokenize("a<b"), Ok(expected.clone()));
        assert_eq!(tokenize("a < b"), Ok(expected));
    }

    #[test]
    fn test_redirections() {
        assert_eq!(
            tokenize("cat <in >out"),
            Ok(vec![ord("cat"), lt(), ord("in"), gt(), ord("out")])
        );
    }

    #[test]
    fn test_adjacent_operators_are_separate_tokens() {
        assert_eq!(tokenize("a<>b"), Ok(vec![ord("a"), lt(), gt(), ord("b")]));
        assert_eq!(tokenize(">>"), Ok(vec![gt(), gt()]));
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(tokenize("\"a b\" c"), Ok(vec![ord("a b"), ord("c")]));
    }

    #[test]
    fn test_quotes_keep_special_characters() {
        assert_eq!(
            tokenize("echo \"x > y\" \"<\""),
            Ok(vec![ord("echo"), ord("x > y"), ord("<")])
        );
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        assert_eq!(tokenize("ab\"c d\"e"), Ok(vec![ord("abc de")]));
        assert_eq!(tokenize("\"a\"\"b\""), Ok(vec![ord("ab")]));
    }

    #[test]
    fn test_closed_quote_flushes_before_operator() {
        assert_eq!(
            tokenize("echo \"hi\">out"),
            Ok(vec![ord("echo"), ord("hi"), gt(), ord("out")])
        );
    }

    #[test]
    fn test_quote_after_operator() {
        assert_eq!(
            tokenize("cat <\"my file\""),
            Ok(vec![ord("cat"), lt(), ord("my file")])
        );
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokenize("setenv X \"\""), Ok(vec![ord("setenv"), ord("X"), ord("")]));
    }

    #[test]
    fn test_unmatched_quote() {
        assert_eq!(tokenize("a \"b"), Err(LexError::UnmatchedQuote));
        assert_eq!(tokenize("\"a\" \"b c"), Err(LexError::UnmatchedQuote));
        assert_eq!(tokenize("\""), Err(LexError::UnmatchedQuote));
    }

    #[test]
    fn test_special_token_stream() {
        assert_eq!(lt().stream(), Some(Stream::Stdin));
        assert_eq!(gt().stream(), Some(Stream::Stdout));
        assert_eq!(ord(">").stream(), None);
        assert!(!ord(">").is_special());
    }

    #[test]
    fn test_rejoined_ordinary_tokens_tokenize_the_same() {
        for line in ["ls -la /tmp", "  grep   -n foo\tbar  ", "a<b>c", "x \"y\"z w"] {
            let words: Vec<String> = tokenize(line)
                .unwrap_or_default()
                .into_iter()
                .filter(|t| !t.is_special())
                .map(Token::into_text)
                .collect();
            let rejoined: Vec<String> = tokenize(&words.join(" "))
                .unwrap_or_default()
                .into_iter()
                .map(Token::into_text)
                .collect();
            assert_eq!(rejoined, words, "line: {:?}", line);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ord("ls").to_string(), "Token: ls (ordinary)");
        assert_eq!(gt().to_string(), "Token: > (special)");
    }
}
