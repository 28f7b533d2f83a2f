use super::{Payload, PayloadError, ValidationError, Validator};
use std::path::PathBuf;
use std::process::{Command, Stdio};

const PASSWORD: &str = "{password}";
const FILE: &str = "{file}";

/// Delegates each check to an external program; exit status 0 means unlocked.
///
/// The template is split on whitespace and run without a shell. `{file}` is
/// replaced with the target path and `{password}` with the candidate.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    program: PathBuf,
    args: Vec<String>,
    file: String,
}

impl CommandValidator {
    pub fn new(template: &str, payload: &Payload) -> Result<Self, PayloadError> {
        let mut parts = template.split_whitespace();
        let program = parts.next().ok_or(PayloadError::EmptyCommand)?;
        let program =
            which::which(program).map_err(|_| PayloadError::MissingProgram(program.to_string()))?;

        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
            file: payload.path().to_string_lossy().into_owned(),
        })
    }

    fn render_args(&self, candidate: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(FILE, &self.file).replace(PASSWORD, candidate))
            .collect()
    }
}

impl Validator for CommandValidator {
    fn validate(&self, candidate: &str) -> Result<bool, ValidationError> {
        let status = Command::new(&self.program)
            .args(self.render_args(candidate))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ValidationError::new(format!("failed to run validator: {e}")))?;
        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload::from_bytes("/tmp/locked.pdf", b"%PDF".to_vec())
    }

    #[test]
    fn test_rejects_empty_and_missing_program() {
        assert!(matches!(
            CommandValidator::new("   ", &payload()),
            Err(PayloadError::EmptyCommand)
        ));
        assert!(matches!(
            CommandValidator::new("definitely-not-a-real-binary-5b1f {password}", &payload()),
            Err(PayloadError::MissingProgram(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_placeholders_are_substituted() {
        let validator =
            CommandValidator::new("test --password={password} --in={file}", &payload()).unwrap();
        assert_eq!(
            validator.render_args("{file}"),
            vec!["--password={file}", "--in=/tmp/locked.pdf"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides() {
        let validator = CommandValidator::new("test {password} = 42", &payload()).unwrap();
        assert_eq!(validator.validate("42"), Ok(true));
        assert_eq!(validator.validate("41"), Ok(false));
    }
}
