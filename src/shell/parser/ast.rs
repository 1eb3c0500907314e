use std::fmt;

/// 重定向操作符绑定的标准流
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdin,  // <
    Stdout, // >
}

impl Stream {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '<' => Some(Stream::Stdin),
            '>' => Some(Stream::Stdout),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Stream::Stdin => "<",
            Stream::Stdout => ">",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdin => write!(f, "standard input"),
            Stream::Stdout => write!(f, "standard output"),
        }
    }
}

/// 校验过的简单命令
///
/// `argv` 非空，`argv[0]` 是程序名。只有命令构建器能创建它。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub(super) argv: Vec<String>,
    pub(super) stdin: Option<String>,
    pub(super) stdout: Option<String>,
}

impl Command {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn arguments(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command name: {}", self.program())?;
        for argument in self.arguments() {
            write!(f, "\nCommand arg: {}", argument)?;
        }
        if let Some(path) = self.stdin() {
            write!(f, "\nCommand stdin: {}", path)?;
        }
        if let Some(path) = self.stdout() {
            write!(f, "\nCommand stdout: {}", path)?;
        }
        Ok(())
    }
}
