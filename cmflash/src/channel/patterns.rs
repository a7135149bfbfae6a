//! Prompt pattern compilation.

use regex::bytes::Regex;

/// Default shell prompt on the modem's console (`#` root, `$` user, `>` CLI).
pub const DEFAULT_PROMPT: &str = r"[#$>]\s*$";

/// Compile a prompt pattern string into a regex.
///
/// Anchors to end of output if no anchor was given, since a prompt is only
/// meaningful as the last thing the device printed.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("{}\\s*$", pattern)
    };

    Regex::new(&pattern)
}
