mod builtin;
#[allow(clippy::module_inception)]
mod executor;
mod process;
mod variable;

pub use executor::{Executor, Outcome};
pub use process::ForkSpawner;
pub use variable::Variable;
