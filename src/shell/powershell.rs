use super::Invoke;
use crate::actions::ActionRequest;
use crate::error::{Result, ToolboxError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info};

/// Characters PowerShell accepts as single-quote delimiters.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Invokes capability module functions through a PowerShell interpreter.
///
/// Every call imports the module and then runs one function with the request
/// parameters as separate single-quoted literals, so values containing spaces
/// or metacharacters reach the function unchanged.
#[derive(Debug, Clone)]
pub struct PowerShell {
    interpreter: String,
    module_path: PathBuf,
}

impl PowerShell {
    pub fn new(interpreter: impl Into<String>, module_path: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            module_path: module_path.into(),
        }
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    /// Checks that the module exists and that the interpreter can import it.
    pub fn load_module(&self) -> Result<()> {
        if !self.module_path.is_file() {
            return Err(ToolboxError::ModuleNotFound(self.module_path.clone()));
        }

        info!(module = %self.module_path.display(), "Loading capability module");
        match self.run(self.import_statement(), "Import-Module") {
            Ok(_) => Ok(()),
            Err(ToolboxError::Operation { status, stderr, .. }) => Err(ToolboxError::ModuleLoad {
                path: self.module_path.clone(),
                message: stderr.unwrap_or(status),
            }),
            Err(other) => Err(other),
        }
    }

    /// Builds the script run for `request`.
    pub fn script_for(&self, request: &ActionRequest) -> String {
        let mut script = format!("{}; {}", self.import_statement(), request.kind().function());
        for param in request.params() {
            script.push(' ');
            script.push_str(&quote(param));
        }
        script
    }

    /// Builds the interpreter command for a script. The script travels as one argument.
    pub fn command(&self, script: &str) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .stdin(Stdio::null());
        command
    }

    fn import_statement(&self) -> String {
        format!(
            "Import-Module {}",
            quote(&self.module_path.to_string_lossy())
        )
    }

    fn run(&self, script: String, function: &str) -> Result<String> {
        debug!(interpreter = %self.interpreter, %script, "Running interpreter");
        let output = self
            .command(&script)
            .output()
            .map_err(|e| ToolboxError::Launch {
                interpreter: self.interpreter.clone(),
                error: Arc::new(e),
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        Err(ToolboxError::Operation {
            function: function.to_string(),
            status: output.status.to_string(),
            stderr: (!stderr.is_empty()).then_some(stderr),
        })
    }
}

impl Invoke for PowerShell {
    fn invoke(&self, request: &ActionRequest) -> Result<String> {
        let function = request.kind().function();
        info!(function, params = request.params().len(), "Invoking module function");
        self.run(self.script_for(request), function)
    }
}

/// Renders `value` as a PowerShell single-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if SINGLE_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use rstest::rstest;
    use std::fs;

    const MISSING_INTERPRETER: &str = "ad-toolbox-no-such-interpreter";

    fn request(kind: ActionKind, params: &[&str]) -> ActionRequest {
        ActionRequest::new(kind, params.iter().map(|p| p.to_string()).collect())
    }

    #[rstest]
    #[case("E123", "'E123'")]
    #[case("", "''")]
    #[case("Domain Admins", "'Domain Admins'")]
    #[case("O'Brien", "'O''Brien'")]
    #[case("O\u{2019}Brien", "'O\u{2019}\u{2019}Brien'")]
    #[case("a; Remove-Item C:\\", "'a; Remove-Item C:\\'")]
    #[case("$env:PATH", "'$env:PATH'")]
    fn test_quote(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(quote(value), expected);
    }

    #[test]
    fn test_script_passes_params_in_order() {
        let shell = PowerShell::new("pwsh", "/opt/toolbox/TechniciansToolbox.psm1");
        let script = shell.script_for(&request(ActionKind::AddMembers, &["E123", "Admins"]));

        assert_eq!(
            script,
            "Import-Module '/opt/toolbox/TechniciansToolbox.psm1'; Add-GroupMemberships 'E123' 'Admins'"
        );
        let employee = script.find("E123").unwrap();
        let group = script.find("Admins").unwrap();
        assert!(employee < group);
    }

    #[rstest]
    #[case(ActionKind::RemoveMembers, &["E9", "Staff"], "Remove-GroupMemberships 'E9' 'Staff'")]
    #[case(ActionKind::BulkRequest, &["C:\\My Files\\changes.csv"], "Invoke-ModifyGroupsFromCsv 'C:\\My Files\\changes.csv'")]
    #[case(ActionKind::RemoveAccounts, &["PC-0042"], "Remove-Accounts 'PC-0042'")]
    fn test_script_targets_module_function(
        #[case] kind: ActionKind,
        #[case] params: &[&str],
        #[case] call: &str,
    ) {
        let shell = PowerShell::new("pwsh", "TechniciansToolbox.psm1");
        let script = shell.script_for(&request(kind, params));
        assert!(script.starts_with("Import-Module 'TechniciansToolbox.psm1'; "));
        assert!(script.ends_with(call), "unexpected script: {script}");
    }

    #[test]
    fn test_command_passes_script_as_single_argument() {
        let shell = PowerShell::new("pwsh", "TechniciansToolbox.psm1");
        let script = shell.script_for(&request(ActionKind::RemoveAccounts, &["PC 01; exit 1"]));
        let command = shell.command(&script);

        assert_eq!(command.get_program(), "pwsh");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["-NoProfile", "-NonInteractive", "-Command", script.as_str()]);
    }

    #[test]
    fn test_load_module_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let shell = PowerShell::new("pwsh", dir.path().join("TechniciansToolbox.psm1"));

        match shell.load_module() {
            Err(ToolboxError::ModuleNotFound(path)) => {
                assert!(path.ends_with("TechniciansToolbox.psm1"))
            },
            other => panic!("Expected ModuleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_module_reports_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("TechniciansToolbox.psm1");
        fs::write(&module, "").unwrap();
        let shell = PowerShell::new(MISSING_INTERPRETER, &module);

        match shell.load_module() {
            Err(ToolboxError::Launch { interpreter, .. }) => {
                assert_eq!(interpreter, MISSING_INTERPRETER)
            },
            other => panic!("Expected Launch error, got {other:?}"),
        }
    }

    #[test]
    fn test_invoke_reports_launch_failure() {
        let shell = PowerShell::new(MISSING_INTERPRETER, "TechniciansToolbox.psm1");
        let err = shell
            .invoke(&request(ActionKind::RemoveAccounts, &["PC01"]))
            .unwrap_err();
        assert!(matches!(err, ToolboxError::Launch { .. }));
        assert!(err.stderr().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_invoke_captures_stdout() {
        // `echo` stands in for the interpreter and prints the arguments it received.
        let shell = PowerShell::new("echo", "TechniciansToolbox.psm1");
        let stdout = shell
            .invoke(&request(ActionKind::RemoveAccounts, &["PC01"]))
            .unwrap();
        assert!(stdout.contains("-Command Import-Module 'TechniciansToolbox.psm1'; Remove-Accounts 'PC01'"));
    }

    #[cfg(unix)]
    #[test]
    fn test_invoke_reports_non_zero_exit() {
        let shell = PowerShell::new("false", "TechniciansToolbox.psm1");
        let err = shell
            .invoke(&request(ActionKind::BulkRequest, &["changes.csv"]))
            .unwrap_err();
        match err {
            ToolboxError::Operation { function, stderr, .. } => {
                assert_eq!(function, "Invoke-ModifyGroupsFromCsv");
                assert!(stderr.is_none());
            },
            other => panic!("Expected Operation error, got {other:?}"),
        }
    }
}
