use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// 流水线运行到哪一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 词法分析后打印 token
    Lex,
    /// 语法分析后打印命令结构
    Syntax,
    /// 完整执行
    Execute,
}

impl Mode {
    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "lex" => Mode::Lex,
            "syn" | "syntax" => Mode::Syntax,
            _ => Mode::Execute,
        }
    }
}

pub struct Config {
    /// 调用名，所有错误信息都以它为前缀
    pub name: String,
    pub mode: Mode,
    pub theme: String,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
    pub logger_stderr: bool,
    pub interactive: bool,
}

impl Config {
    fn get_config_dir() -> PathBuf {
        if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config/ish")
        } else {
            PathBuf::from("tmp")
        }
    }

    fn default(name: &str) -> Self {
        let config_dir = Self::get_config_dir();
        Config {
            name: name.to_string(),
            mode: Mode::Execute,
            theme: String::from("default"),
            history_file: config_dir.join(".ish_history"),
            editor_mode: String::from("vi"),
            logger_level: String::from("info"),
            logger_dir: config_dir.join("logs"),
            logger_stderr: false,
            interactive: io::stdin().is_terminal(),
        }
    }

    pub fn new(name: &str) -> Self {
        // 优先加载环境变量
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        // 默认配置
        let mut config = Config::default(name);

        // 从环境变量加载配置
        if let Ok(mode) = env::var("ISH_MODE") {
            config.mode = Mode::from_name(&mode);
        }

        if let Ok(theme) = env::var("ISH_THEME") {
            config.theme = theme;
        }

        if let Ok(editor) = env::var("ISH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Ok(history) = env::var("ISH_HISTORY") {
            config.history_file = expand_path(&history);
        }

        if let Ok(level) = env::var("ISH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("ISH_LOG_DIR") {
            config.logger_dir = expand_path(&dir);
        }

        if let Ok(flag) = env::var("ISH_LOG_STDERR") {
            config.logger_stderr = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "emacs" => EditMode::Emacs,
            _ => EditMode::Vi,
        }
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
