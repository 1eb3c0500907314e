use log::debug;

use crate::shell::parser::Command;

use super::builtin::{Builtin, BuiltinError, Effect};
use super::process::{ExitStatus, SpawnError, Spawner};
use super::variable::Environment;

/// 一行命令执行完之后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    BuiltinHandled,
    BuiltinError(BuiltinError),
    Spawned(ExitStatus),
    SpawnError(SpawnError),
    ExitRequested,
}

pub struct Executor<E, S> {
    variables: E,
    spawner: S,
}

impl<E: Environment, S: Spawner> Executor<E, S> {
    pub fn new(variables: E, spawner: S) -> Self {
        Self { variables, spawner }
    }

    pub fn execute(&mut self, command: &Command) -> Outcome {
        // 处理内建命令
        if let Some(outcome) = self.handle_builtin(command) {
            debug!("执行内建命令: {:?} -> {:?}", command.argv(), outcome);
            return outcome;
        }

        // 执行外部命令
        debug!("执行外部命令: {:?}", command);
        match self.spawner.spawn(command) {
            Ok(status) => Outcome::Spawned(status),
            Err(e) => Outcome::SpawnError(e),
        }
    }

    // 内建命令忽略重定向
    fn handle_builtin(&mut self, command: &Command) -> Option<Outcome> {
        let builtin = Builtin::from_name(command.program())?;
        let outcome = match builtin.run(command.arguments(), &mut self.variables) {
            Ok(Effect::Done) => Outcome::BuiltinHandled,
            Ok(Effect::Exit) => Outcome::ExitRequested,
            Err(e) => Outcome::BuiltinError(e),
        };
        Some(outcome)
    }
}
