use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::Display;
use std::ops::ControlFlow;

use crate::shell::executor::{Executor, ForkSpawner, Outcome, Variable};
use crate::shell::parser::{build, tokenize, ParseError};
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::utils::config::{Config, Mode};
use crate::utils::theme::{self, Theme};

pub struct Shell<'a> {
    config: &'a Config,
    theme: Theme,
    readline: ReadlineManager<'a>,
    executor: Executor<Variable, ForkSpawner>,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            theme: theme::load_theme(&config.theme),
            readline: ReadlineManager::new(config),
            executor: Executor::new(Variable::new(), ForkSpawner::new(&config.name)),
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("初始化 {}, 模式 {:?}", self.config.name, self.config.mode);
        self.readline.load_history()?;

        let result = self.run_loop();
        self.readline.save_history()?;

        debug!("退出 {}...", self.config.name);
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            let prompt = self.theme.prompt();

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    if self.handle_input(&line).is_break() {
                        info!("收到 exit 命令，退出");
                        break;
                    }
                }
                Err(ReadlineError::Eof) => {
                    info!("输入结束，退出");
                    println!();
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    warn!("接收到中断信号，丢弃当前行");
                }
                Err(err) => {
                    error!("读取输入失败: {}", err);
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// 一行输入走完 词法分析 -> 语法分析 -> 执行，任何一步出错都只放弃这一行
    fn handle_input(&mut self, line: &str) -> ControlFlow<()> {
        if !line.trim().is_empty() {
            if let Err(err) = self.readline.add_history(line.to_string()) {
                warn!("无法添加历史记录: {}", err);
            }
        }
        debug!("执行命令: {}", line);

        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.report(&e);
                return ControlFlow::Continue(());
            }
        };

        if self.config.mode == Mode::Lex {
            for token in &tokens {
                println!("{}", token);
            }
            return ControlFlow::Continue(());
        }

        let command = match build(tokens) {
            Ok(command) => command,
            // 空行什么也不做
            Err(ParseError::EmptyCommand) => return ControlFlow::Continue(()),
            Err(e) => {
                self.report(&e);
                return ControlFlow::Continue(());
            }
        };

        if self.config.mode == Mode::Syntax {
            println!("{}", command);
            return ControlFlow::Continue(());
        }

        match self.executor.execute(&command) {
            Outcome::BuiltinHandled => {}
            Outcome::Spawned(status) => {
                if status != 0 {
                    debug!("{} 退出状态码 {}", command.program(), status);
                }
            }
            Outcome::BuiltinError(e) => self.report(&e),
            Outcome::SpawnError(e) => self.report(&e),
            Outcome::ExitRequested => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn report(&self, err: &dyn Display) {
        debug!("{}", err);
        eprintln!(
            "{}",
            self.theme.error(format!("{}: {}", self.config.name, err))
        );
    }
}
