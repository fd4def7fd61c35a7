//! Command-line definitions (clap derive).
use clap::{Parser, Subcommand};

use crate::platform::Platform;

/// Top-level CLI entry point for the native project configurator.
#[derive(Parser, Debug)]
#[command(
    name = "platform-config",
    about = "Patch native iOS and Android project files from configuration values",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview patches without writing project files
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the project root holding `<platform>.config.json`
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve configuration and patch a native project
    Apply(ApplyOpts),
    /// List the properties a platform asks for
    Properties(PropertiesOpts),
    /// Print version information
    Version,
}

/// Options for the `apply` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ApplyOpts {
    /// Target platform
    #[arg(value_enum, ignore_case = true)]
    pub platform: Platform,

    /// Native project directory (default: `<root>/platforms/<platform>`)
    #[arg(long)]
    pub project: Option<std::path::PathBuf>,

    /// Supply a value up front (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Ask for these properties instead of the schema's (`name|description,...`)
    #[arg(long, value_name = "SPEC")]
    pub properties: Option<String>,
}

/// Options for the `properties` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PropertiesOpts {
    /// Target platform
    #[arg(value_enum, ignore_case = true)]
    pub platform: Platform,

    /// List these properties instead of the schema's (`name|description,...`)
    #[arg(long, value_name = "SPEC")]
    pub properties: Option<String>,
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_apply_platform() {
        let cli = Cli::parse_from(["platform-config", "apply", "ios"]);
        let Command::Apply(opts) = cli.command else {
            panic!("Expected Apply command");
        };
        assert_eq!(opts.platform, Platform::Ios);
        assert!(opts.set.is_empty());
        assert!(opts.project.is_none());
    }

    #[test]
    fn parse_apply_platform_ignores_case() {
        let cli = Cli::parse_from(["platform-config", "apply", "Android"]);
        assert!(matches!(
            cli.command,
            Command::Apply(ApplyOpts { platform: Platform::Android, .. })
        ));
    }

    #[test]
    fn parse_apply_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["platform-config", "apply", "windows"]).is_err());
    }

    #[test]
    fn parse_apply_set_values() {
        let cli = Cli::parse_from([
            "platform-config",
            "apply",
            "android",
            "--set",
            "AppId=com.example",
            "--set",
            "WeexBundle=http://host/app.js?a=b",
        ]);
        let Command::Apply(opts) = cli.command else {
            panic!("Expected Apply command");
        };
        assert_eq!(
            opts.set,
            vec![
                ("AppId".to_string(), "com.example".to_string()),
                ("WeexBundle".to_string(), "http://host/app.js?a=b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_apply_rejects_malformed_set() {
        assert!(
            Cli::try_parse_from(["platform-config", "apply", "ios", "--set", "AppId"]).is_err()
        );
        assert!(Cli::try_parse_from(["platform-config", "apply", "ios", "--set", "=x"]).is_err());
    }

    #[test]
    fn parse_apply_project_and_properties() {
        let cli = Cli::parse_from([
            "platform-config",
            "apply",
            "ios",
            "--project",
            "/tmp/app",
            "--properties",
            "AppName|Name,AppId",
        ]);
        let Command::Apply(opts) = cli.command else {
            panic!("Expected Apply command");
        };
        assert_eq!(opts.project, Some(std::path::PathBuf::from("/tmp/app")));
        assert_eq!(opts.properties.as_deref(), Some("AppName|Name,AppId"));
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["platform-config", "-d", "apply", "ios"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_root_override() {
        let cli = Cli::parse_from(["platform-config", "--root", "/tmp/project", "apply", "ios"]);
        assert_eq!(
            cli.global.root,
            Some(std::path::PathBuf::from("/tmp/project"))
        );
    }

    #[test]
    fn parse_properties() {
        let cli = Cli::parse_from(["platform-config", "properties", "ios"]);
        assert!(matches!(cli.command, Command::Properties(_)));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["platform-config", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["platform-config", "-v", "version"]);
        assert!(cli.verbose);
    }

    #[test]
    fn key_val_keeps_equals_in_value() {
        assert_eq!(
            parse_key_val("A=b=c").unwrap(),
            ("A".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_key_val("A=").unwrap(), ("A".to_string(), String::new()));
    }
}
