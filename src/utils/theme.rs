use colored::Colorize;

pub struct Theme {
    pub prompt: String,
    pub prompt_style: Box<dyn Fn(String) -> String>,
    pub error_style: Box<dyn Fn(String) -> String>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            prompt: "% ".to_string(),
            prompt_style: Box::new(|s| s.bright_cyan().to_string()),
            error_style: Box::new(|s| s.bright_red().to_string()),
        }
    }
}

impl Theme {
    pub fn prompt(&self) -> String {
        (self.prompt_style)(self.prompt.clone())
    }

    pub fn error(&self, message: String) -> String {
        (self.error_style)(message)
    }
}

pub fn load_theme(theme_name: &str) -> Theme {
    match theme_name {
        "default" => Theme::default(),
        "dark" => Theme {
            prompt: "ish➤ ".to_string(),
            prompt_style: Box::new(|s| s.bright_purple().to_string()),
            error_style: Box::new(|s| s.red().to_string()),
        },
        _ => Theme::default(),
    }
}

/// 非交互模式下不输出颜色
pub fn set_colored(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}
