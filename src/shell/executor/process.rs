use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::os::raw::c_char;
use std::os::unix::io::RawFd;
use std::ptr;

use log::{debug, warn};
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, fork, write, ForkResult, Pid};
use thiserror::Error;

use crate::shell::parser::Command;

/// 子进程退出码，被信号终止时为 128 + 信号值
pub type ExitStatus = i32;

/// 父进程这一侧的失败；子进程里的失败只体现为退出码 1
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("{}: argument contains a NUL byte", .program)]
    NulByte { program: String },
    #[error("fork: {}", .0.desc())]
    Fork(Errno),
    #[error("wait: {}", .0.desc())]
    Wait(Errno),
}

/// 启动一个外部程序（带重定向）并阻塞直到它结束
///
/// `&mut self` 保证同一时间只有一个子进程在运行。
pub trait Spawner {
    fn spawn(&mut self, command: &Command) -> Result<ExitStatus, SpawnError>;
}

/// fork + execvp，重定向只发生在子进程的描述符表里
pub struct ForkSpawner {
    // "ish: "
    prefix: Vec<u8>,
}

impl ForkSpawner {
    pub fn new(program_name: &str) -> Self {
        Self {
            prefix: format!("{}: ", program_name).into_bytes(),
        }
    }

    // fork 之后不能再分配内存，用到的数据都由 `Launch::prepare` 预先准备
    fn run_child(&self, launch: &Launch) -> ! {
        let failure = match launch.redirect_all().and_then(|()| launch.exec()) {
            Ok(never) => match never {},
            Err(failure) => failure,
        };
        // 不经过 std 的 stderr 锁，fork 之后那把锁可能还被别的线程持有
        for piece in failure.pieces(&self.prefix) {
            let _ = write(io::stderr(), piece);
        }
        unsafe { libc::_exit(libc::EXIT_FAILURE) }
    }
}

impl Spawner for ForkSpawner {
    fn spawn(&mut self, command: &Command) -> Result<ExitStatus, SpawnError> {
        let launch = Launch::prepare(command)?;

        // 先刷新缓冲区，否则子进程退出时会再输出一遍
        if let Err(e) = io::stdout().flush() {
            warn!("刷新标准输出失败: {}", e);
        }

        match unsafe { fork() }.map_err(SpawnError::Fork)? {
            ForkResult::Child => self.run_child(&launch),
            ForkResult::Parent { child } => {
                debug!("启动子进程 pid={}: {:?}", child, command.argv());
                let status = wait_child(child)?;
                debug!("子进程 pid={} 退出, 状态码 {}", child, status);
                Ok(status)
            }
        }
    }
}

fn wait_child(child: Pid) -> Result<ExitStatus, SpawnError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, status)) => return Ok(status),
            Ok(WaitStatus::Signaled(_, sig, _core_dumped)) => return Ok(128 + sig as i32),
            Ok(other) => debug!("忽略子进程状态: {:?}", other),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(SpawnError::Wait(errno)),
        }
    }
}

/// 子进程需要的全部数据，在 fork 之前转换成 C 字符串
struct Launch {
    argv: Vec<CString>,
    // 以空指针结尾，指向 `argv` 里的字符串
    argv_ptrs: Vec<*const c_char>,
    stdin: Option<CString>,
    stdout: Option<CString>,
}

impl Launch {
    fn prepare(command: &Command) -> Result<Self, SpawnError> {
        let nul_byte = |_| SpawnError::NulByte {
            program: command.program().to_string(),
        };
        let argv = command
            .argv()
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nul_byte)?;
        let stdin = command.stdin().map(CString::new).transpose().map_err(nul_byte)?;
        let stdout = command.stdout().map(CString::new).transpose().map_err(nul_byte)?;

        let argv_ptrs = argv
            .iter()
            .map(|arg| arg.as_ptr())
            .chain([ptr::null()])
            .collect();
        Ok(Self {
            argv,
            argv_ptrs,
            stdin,
            stdout,
        })
    }

    // 先处理标准输出，再处理标准输入
    fn redirect_all(&self) -> Result<(), ChildFailure<'_>> {
        if let Some(path) = &self.stdout {
            let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
            redirect(path, flags, libc::STDOUT_FILENO)?;
        }
        if let Some(path) = &self.stdin {
            redirect(path, OFlag::O_RDONLY, libc::STDIN_FILENO)?;
        }
        Ok(())
    }

    fn exec(&self) -> Result<std::convert::Infallible, ChildFailure<'_>> {
        // Rust 运行时忽略了 SIGPIPE，而被忽略的信号会跨 exec 继承
        let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
        // nix 的 execvp 会在内部分配指针数组，这里直接用准备好的
        unsafe { libc::execvp(self.argv[0].as_ptr(), self.argv_ptrs.as_ptr()) };
        Err(ChildFailure {
            name: &self.argv[0],
            errno: Errno::last(),
        })
    }
}

fn redirect(path: &CStr, flags: OFlag, target: RawFd) -> Result<(), ChildFailure<'_>> {
    let failed = |errno| ChildFailure { name: path, errno };
    let fd = open(path, flags, Mode::S_IRUSR | Mode::S_IWUSR).map_err(failed)?;
    if fd != target {
        dup2(fd, target).map_err(failed)?;
        close(fd).map_err(failed)?;
    }
    Ok(())
}

/// 子进程里失败的程序名或重定向文件，以及对应的 errno
#[derive(Debug)]
struct ChildFailure<'a> {
    name: &'a CStr,
    errno: Errno,
}

impl ChildFailure<'_> {
    /// `prefix name: 描述\n`，逐段写出，不拼接
    fn pieces<'p>(&'p self, prefix: &'p [u8]) -> [&'p [u8]; 5] {
        [
            prefix,
            self.name.to_bytes(),
            b": ",
            self.errno.desc().as_bytes(),
            b"\n",
        ]
    }
}
