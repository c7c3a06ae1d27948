//! 搜索结果清洗：剔除登录墙、订阅提示等噪声行

/// 需要剔除的行标记，大小写不敏感的子串匹配
pub const DROP_PHRASES: &[&str] = &[
    "You must log in to",
    "Sign in to view",
    "Log in to reply",
    "Sign up",
    "Register",
    "Please login",
    "Join now",
    "Subscribe",
];

fn is_dropped(line: &str) -> bool {
    let lowered = line.to_lowercase();
    DROP_PHRASES
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()))
}

/// 行分隔符：除 `\n` 与 `\r\n` 外，单独的 `\r`、垂直制表、换页、
/// 文件/组/记录分隔符、NEL 以及 Unicode 行/段分隔符都视为换行
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// 按行切分，`\r\n` 视为一个换行，末尾的换行不产生空行
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..at]);
        start = at + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// 逐行过滤文本，保留不含任何标记短语的行
///
/// 纯过滤操作，对已清洗的文本再次清洗结果不变。
pub fn clean_text(text: &str) -> String {
    split_lines(text)
        .into_iter()
        .filter(|line| !is_dropped(line))
        .collect::<Vec<_>>()
        .join("\n")
}
