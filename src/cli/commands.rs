use crate::error::Result;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the capability module looked up in the working directory.
pub const DEFAULT_MODULE: &str = "TechniciansToolbox.psm1";

#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "powershell";
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "pwsh";

/// Interactive Active Directory toolbox
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the PowerShell capability module
    #[arg(long, env = "TOOLBOX_MODULE", default_value = DEFAULT_MODULE)]
    pub module: PathBuf,

    /// PowerShell executable used to run module functions
    #[arg(long, env = "TOOLBOX_INTERPRETER", default_value = DEFAULT_INTERPRETER)]
    pub interpreter: String,

    /// Abort at startup when the module cannot be loaded
    #[arg(long, env = "TOOLBOX_REQUIRE_MODULE")]
    pub require_module: bool,

    /// Never clear the terminal
    #[arg(long, env = "TOOLBOX_NO_CLEAR")]
    pub no_clear: bool,

    /// Hide the progress spinner while a module function runs
    #[arg(long, env = "TOOLBOX_NO_SPINNER")]
    pub no_spinner: bool,

    /// Write logs to a daily rolling file in this directory instead of stderr
    #[arg(long, env = "TOOLBOX_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// Settings the session and the module invoker run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path of the capability module.
    pub module_path: PathBuf,
    pub interpreter: String,
    pub require_module: bool,
    pub clear_screen: bool,
    pub spinner: bool,
}

impl Config {
    /// Resolves the parsed flags against the current working directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = env::current_dir()?;
        Ok(Self::resolve(cli, &cwd))
    }

    pub fn resolve(cli: &Cli, cwd: &Path) -> Self {
        let module_path = if cli.module.is_absolute() {
            cli.module.clone()
        } else {
            cwd.join(&cli.module)
        };
        debug!(module = %module_path.display(), interpreter = %cli.interpreter, "Resolved configuration");

        Self {
            module_path,
            interpreter: cli.interpreter.clone(),
            require_module: cli.require_module,
            clear_screen: !cli.no_clear,
            spinner: !cli.no_spinner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "TOOLBOX_MODULE",
        "TOOLBOX_INTERPRETER",
        "TOOLBOX_REQUIRE_MODULE",
        "TOOLBOX_NO_CLEAR",
        "TOOLBOX_NO_SPINNER",
        "TOOLBOX_LOG_DIR",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let cli = Cli::try_parse_from(["ad-toolbox"]).unwrap();
        assert_eq!(cli.module, PathBuf::from(DEFAULT_MODULE));
        assert_eq!(cli.interpreter, DEFAULT_INTERPRETER);
        assert!(!cli.require_module);
        assert!(cli.log_dir.is_none());

        let config = Config::resolve(&cli, Path::new("/srv/toolbox"));
        assert_eq!(
            config.module_path,
            Path::new("/srv/toolbox").join(DEFAULT_MODULE)
        );
        assert!(config.clear_screen);
        assert!(config.spinner);
    }

    #[test]
    #[serial]
    fn test_flags_override_defaults() {
        clear_env();
        let cli = Cli::try_parse_from([
            "ad-toolbox",
            "--interpreter",
            "powershell.exe",
            "--require-module",
            "--no-clear",
            "--no-spinner",
        ])
        .unwrap();
        let config = Config::resolve(&cli, Path::new("/srv/toolbox"));
        assert_eq!(config.interpreter, "powershell.exe");
        assert!(config.require_module);
        assert!(!config.clear_screen);
        assert!(!config.spinner);
    }

    #[test]
    #[serial]
    fn test_environment_fallbacks() {
        clear_env();
        env::set_var("TOOLBOX_INTERPRETER", "/usr/bin/pwsh");
        env::set_var("TOOLBOX_REQUIRE_MODULE", "true");
        let cli = Cli::try_parse_from(["ad-toolbox"]);
        clear_env();

        let cli = cli.unwrap();
        assert_eq!(cli.interpreter, "/usr/bin/pwsh");
        assert!(cli.require_module);
    }

    #[test]
    #[serial]
    fn test_absolute_module_path_is_kept() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("Custom.psm1");
        let cli = Cli::try_parse_from(["ad-toolbox", "--module", module.to_str().unwrap()]).unwrap();

        let config = Config::resolve(&cli, Path::new("/elsewhere"));
        assert_eq!(config.module_path, module);
    }
}
