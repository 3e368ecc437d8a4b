//! Pattern helpers for prompt detection.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// Blank lines and CSI sequences (cursor moves, erase line) a device may
/// send ahead of the echo.
static ECHO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?:[\r\n]|\x1b\[[0-?]*[ -/]*[@-~])*").expect("valid echo prefix regex")
});

/// Compile a prompt pattern string into a regex.
///
/// Prompts are only meaningful at the very end of what the device has sent
/// so far, so the pattern is anchored to the end of input (allowing trailing
/// whitespace) unless it already carries a `$` anchor. `\z` is used rather
/// than `$` so that `(?m)` patterns cannot stop on an earlier line.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("{}\\s*\\z", pattern)
    };

    Regex::new(&pattern)
}

/// Strip the echoed command line from the start of `output`.
///
/// Devices echo what they are sent, so the text preceding the next prompt
/// begins with the command itself. Leading blank lines and cursor control
/// sequences are skipped first.
/// Returns `None` when `output` does not start with the echo, meaning it
/// belongs to some earlier command.
pub fn strip_echo<'a>(output: &'a [u8], command: &str) -> Option<&'a [u8]> {
    let start = ECHO_PREFIX.find(output).map_or(0, |m| m.end());
    let output = &output[start..];

    if !output.starts_with(command.as_bytes()) {
        return None;
    }

    match memchr::memchr(b'\n', output) {
        Some(nl) => Some(&output[nl + 1..]),
        None => Some(&[]),
    }
}

/// Convert CRLF line endings (PTY and telnet NVT output) to LF.
pub fn normalize_newlines(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut iter = data.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}
