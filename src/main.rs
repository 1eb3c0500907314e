use log::{debug, error};
use std::env;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use crate::shell::Shell;
use crate::utils::config::Config;
use crate::utils::log::init_logger;
use crate::utils::path::program_name;
use crate::utils::theme;

mod shell;
mod utils;

fn main() -> ExitCode {
    let name = program_name(env::args_os().next().map(|arg| arg.to_string_lossy().into_owned()));
    let config = Config::new(&name);
    init_logger(&config);
    theme::set_colored(config.interactive && io::stderr().is_terminal());
    debug!("配置加载成功, 日志目录 {}", config.logger_dir.display());

    let mut shell = Shell::new(&config);
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} 异常退出: {}", name, e);
            eprintln!("{}: {}", name, e);
            ExitCode::FAILURE
        }
    }
}
