use std::borrow::Cow;

pub const DEFAULT_NAME: &str = "ish";

pub fn basename(path: &str) -> Cow<'_, str> {
    let mut pieces = path.rsplit('/');
    match pieces.next() {
        Some(p) => p.into(),
        None => path.into(),
    }
}

/// 从 argv[0] 得到调用名，取不到时退回默认名
pub fn program_name(arg0: Option<String>) -> String {
    match arg0.as_deref().map(basename) {
        Some(name) if !name.is_empty() => name.into_owned(),
        _ => DEFAULT_NAME.to_string(),
    }
}
