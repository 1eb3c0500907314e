use log::debug;
use nix::errno::Errno;
use thiserror::Error;

use super::variable::Environment;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    #[error("missing variable")]
    MissingVariable,
    #[error("too many arguments")]
    TooManyArguments,
    #[error("HOME not set")]
    HomeNotSet,
    #[error("invalid variable name")]
    InvalidName,
    #[error("invalid variable value")]
    InvalidValue,
    #[error("{}", .0.desc())]
    ChangeDir(Errno),
}

/// 内建命令执行后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Done,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Setenv,
    Unsetenv,
    Cd,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Builtin::Exit),
            "setenv" => Some(Builtin::Setenv),
            "unsetenv" => Some(Builtin::Unsetenv),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }

    /// 参数个数在执行前检查，出错时命令不产生任何效果
    pub fn run<E: Environment>(
        self,
        arguments: &[String],
        env: &mut E,
    ) -> Result<Effect, BuiltinError> {
        match self {
            Builtin::Exit => builtin_exit(arguments),
            Builtin::Setenv => builtin_setenv(arguments, env),
            Builtin::Unsetenv => builtin_unsetenv(arguments, env),
            Builtin::Cd => builtin_cd(arguments, env),
        }
    }
}

fn builtin_exit(arguments: &[String]) -> Result<Effect, BuiltinError> {
    if !arguments.is_empty() {
        return Err(BuiltinError::TooManyArguments);
    }
    Ok(Effect::Exit)
}

fn builtin_setenv<E: Environment>(arguments: &[String], env: &mut E) -> Result<Effect, BuiltinError> {
    let (name, value) = match arguments {
        [] => return Err(BuiltinError::MissingVariable),
        [name] => (name, ""),
        [name, value] => (name, value.as_str()),
        _ => return Err(BuiltinError::TooManyArguments),
    };
    check_name(name)?;
    if value.contains('\0') {
        return Err(BuiltinError::InvalidValue);
    }
    env.set(name, value);
    Ok(Effect::Done)
}

fn builtin_unsetenv<E: Environment>(
    arguments: &[String],
    env: &mut E,
) -> Result<Effect, BuiltinError> {
    let name = match arguments {
        [] => return Err(BuiltinError::MissingVariable),
        [name] => name,
        _ => return Err(BuiltinError::TooManyArguments),
    };
    check_name(name)?;
    env.unset(name);
    Ok(Effect::Done)
}

fn builtin_cd<E: Environment>(arguments: &[String], env: &mut E) -> Result<Effect, BuiltinError> {
    let target = match arguments {
        [] => env.get("HOME").ok_or(BuiltinError::HomeNotSet)?,
        [path] => path.clone(),
        _ => return Err(BuiltinError::TooManyArguments),
    };
    debug!("切换目录: {}", target);
    env.change_dir(&target).map_err(BuiltinError::ChangeDir)?;
    Ok(Effect::Done)
}

// 系统会以 EINVAL 拒绝这些名字，std::env 更是直接 panic
fn check_name(name: &str) -> Result<(), BuiltinError> {
    if name.is_empty() || name.contains(|c: char| c == '=' || c == '\0') {
        return Err(BuiltinError::InvalidName);
    }
    Ok(())
}
