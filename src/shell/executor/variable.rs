use std::env;

use log::debug;
use nix::unistd::chdir;

/// 内建命令能修改的进程级状态：环境变量和工作目录
///
/// 执行器只通过这个 trait 访问它们，测试里换成内存实现。
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str);

    fn unset(&mut self, name: &str);

    fn change_dir(&mut self, path: &str) -> nix::Result<()>;
}

/// 当前进程自己的环境
#[derive(Debug, Default)]
pub struct Variable;

impl Variable {
    pub fn new() -> Self {
        Self
    }
}

impl Environment for Variable {
    fn get(&self, name: &str) -> Option<String> {
        env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }

    fn set(&mut self, name: &str, value: &str) {
        debug!("设置环境变量: {}={}", name, value);
        env::set_var(name, value);
    }

    fn unset(&mut self, name: &str) {
        debug!("删除环境变量: {}", name);
        env::remove_var(name);
    }

    fn change_dir(&mut self, path: &str) -> nix::Result<()> {
        chdir(path)
    }
}
