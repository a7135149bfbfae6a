//! Response type for console command execution.

use std::time::Duration;

/// Response from a console command.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Build a response from raw console output ending in `prompt`.
    pub fn from_raw(
        command: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let command = command.into();
        let raw_result = raw_result.into();
        let result = normalize_output(&raw_result, &command);
        Self {
            command,
            result,
            raw_result,
            prompt: prompt.into(),
            elapsed,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Strip the echoed command and the trailing prompt line.
fn normalize_output(raw: &str, command: &str) -> String {
    let output = raw
        .trim_start_matches(['\r', '\n'])
        .strip_prefix(command)
        .unwrap_or(raw)
        .trim_start_matches(['\r', '\n']);

    match output.rfind('\n') {
        Some(pos) => output[..pos].trim_end_matches('\r').to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dmcli_output() {
        let raw = "dmcli eRT setv Device.X bool true\r\n\
                   CR component name is: eRT.com.cisco.spvtg.ccsp.CR\r\n\
                   execute succeed\r\n\
                   root@F5685:~# ";
        let response = Response::from_raw(
            "dmcli eRT setv Device.X bool true",
            raw,
            "root@F5685:~#",
            Duration::from_millis(250),
        );

        assert_eq!(response.lines().count(), 2);
        assert!(response.contains("execute succeed"));
        assert!(!response.contains("root@F5685"));
        assert!(!response.contains("setv"));
    }

    #[test]
    fn test_prompt_only_output_is_empty() {
        let response = Response::from_raw("true", "true\r\n# ", "#", Duration::ZERO);
        assert_eq!(response.result, "");
        assert_eq!(response.to_string(), "");
    }
}
