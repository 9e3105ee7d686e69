//! Turning a suggested code block into a single shell input line.

const COMMAND_DELIMITER: char = ';';
const CMD_COMMAND_DELIMITER: char = '&';

fn is_cmd(commandline: &str) -> bool {
    let trimmed = commandline.trim();
    trimmed.eq_ignore_ascii_case("cmd.exe") || trimmed.eq_ignore_ascii_case("cmd")
}

/// Join a multi-line code block into one line so that pasting it into the
/// shell doesn't run each line as it arrives.
///
/// `cmd.exe` chains commands with `&`; everything else gets `;`.
pub fn commandline_from_code(code: &str, active_commandline: Option<&str>) -> String {
    let delimiter = if active_commandline.is_some_and(is_cmd) {
        CMD_COMMAND_DELIMITER
    } else {
        COMMAND_DELIMITER
    };
    code.replace("\r\n", "\n").replace('\n', &delimiter.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_untouched() {
        assert_eq!(commandline_from_code("ls -la", Some("bash")), "ls -la");
    }

    #[test]
    fn test_newlines_become_semicolons() {
        assert_eq!(
            commandline_from_code("cd src\nls", Some("pwsh.exe")),
            "cd src;ls"
        );
        assert_eq!(commandline_from_code("a\r\nb", None), "a;b");
    }

    #[test]
    fn test_cmd_uses_ampersand() {
        assert_eq!(commandline_from_code("cd src\ndir", Some("cmd.exe")), "cd src&dir");
        assert_eq!(commandline_from_code("cd src\ndir", Some("CMD")), "cd src&dir");
    }
}
