use crate::utils::config::Config;
use log::{debug, error, warn};
pub use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use rustyline::{CompletionType, Config as RLConfig};
use std::fs;
use std::io::{self, BufRead, Write};

enum Input {
    /// 终端：行编辑 + 历史记录
    Editor(Box<Editor<(), FileHistory>>),
    /// 管道或文件：逐行读取，并回显提示符和读到的行
    Stream(io::StdinLock<'static>),
}

pub struct ReadlineManager<'a> {
    config: &'a Config,
    input: Input,
}

impl<'a> ReadlineManager<'a> {
    pub fn new(config: &'a Config) -> Self {
        let input = if config.interactive {
            Self::create_editor(config)
                .map(|editor| Input::Editor(Box::new(editor)))
                .unwrap_or_else(|err| {
                    error!("无法初始化 readline: {}", err);
                    Input::Stream(io::stdin().lock())
                })
        } else {
            Input::Stream(io::stdin().lock())
        };
        Self { config, input }
    }

    fn create_editor(config: &Config) -> Result<Editor<(), FileHistory>, ReadlineError> {
        let rl_config = RLConfig::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(config.get_edit_mode())
            .build();
        Editor::with_config(rl_config)
    }

    pub fn load_history(&mut self) -> Result<(), ReadlineError> {
        let Input::Editor(editor) = &mut self.input else {
            return Ok(());
        };
        if let Err(err) = editor.load_history(&self.config.history_file) {
            warn!(
                "无法加载历史记录: {} {}",
                self.config.history_file.display(),
                err
            );
        } else {
            debug!("历史记录加载成功");
        }
        Ok(())
    }

    /// 读取一行；输入结束时返回 `ReadlineError::Eof`
    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        match &mut self.input {
            Input::Editor(editor) => editor.readline(prompt),
            Input::Stream(stdin) => {
                let mut stdout = io::stdout();
                write!(stdout, "{}", prompt)?;
                stdout.flush()?;

                // 按字节读，非 UTF-8 的字节替换成 U+FFFD
                let mut bytes = Vec::new();
                if stdin.read_until(b'\n', &mut bytes)? == 0 {
                    return Err(ReadlineError::Eof);
                }
                let line = String::from_utf8_lossy(&bytes);
                let line = line.trim_end_matches(&['\n', '\r'][..]).to_string();
                writeln!(stdout, "{}", line)?;
                stdout.flush()?;
                Ok(line)
            }
        }
    }

    pub fn add_history(&mut self, line: String) -> Result<bool, ReadlineError> {
        match &mut self.input {
            Input::Editor(editor) => editor.add_history_entry(line),
            Input::Stream(_) => Ok(false),
        }
    }

    pub fn save_history(&mut self) -> Result<(), ReadlineError> {
        let Input::Editor(editor) = &mut self.input else {
            return Ok(());
        };
        // 确保历史文件目录存在
        if let Some(parent) = self.config.history_file.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!("无法创建历史记录目录: {}", err);
                return Ok(());
            }
        }
        if let Err(err) = editor.save_history(&self.config.history_file) {
            error!("保存历史记录失败: {}", err);
        } else {
            debug!("历史记录保存成功");
        }
        Ok(())
    }
}
