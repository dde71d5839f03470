//! Command-line front end for `headercheck-c`
//!
//! Exit status:
//! - 0: the file is header-only
//! - 1: at least one externally declared name is never defined in it
//! - 2: the file could not be checked (I/O, preprocessor or syntax failure)

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use headercheck_c::config::{DEFAULT_MARKER_MACRO, DEFAULT_PREPROCESSOR};
use headercheck_c::{CheckConfig, CheckReport, HeaderChecker, Verdict};
use log::LevelFilter;

pub const EXIT_RESOLVED: u8 = 0;
pub const EXIT_UNRESOLVED: u8 = 1;
pub const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options are long-only so they never shadow preprocessor flags, and must
/// come before FILE.
#[derive(Debug, Parser)]
#[command(name = "headercheck")]
#[command(version)]
#[command(about = "Exit 0 if every external declaration in a C header is defined in that header")]
pub struct Cli {
    /// Preprocessor program
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_PREPROCESSOR)]
    pub cpp: String,

    /// Directory of stub system headers (default: built-in libc stubs)
    #[arg(long = "fake-libc", value_name = "DIR")]
    pub fake_libc: Option<PathBuf>,

    /// Macro defined while preprocessing
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MARKER_MACRO)]
    pub marker: String,

    /// Check what parses instead of failing on syntax errors
    #[arg(long)]
    pub tolerant: bool,

    /// Print the unresolved names
    #[arg(long)]
    pub list: bool,

    /// Report format (json always prints the full report)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// More logging; repeat for more detail
    #[arg(long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(long)]
    pub quiet: bool,

    /// C header to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Flags passed verbatim to the preprocessor
    #[arg(
        value_name = "CPP_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub cpp_args: Vec<String>,
}

impl Cli {
    pub fn config(&self) -> CheckConfig {
        let mut config = CheckConfig::default()
            .with_preprocessor(self.cpp.clone())
            .with_marker_macro(self.marker.clone())
            .with_cpp_args(self.cpp_args.iter().cloned())
            .with_tolerant(self.tolerant);
        if let Some(dir) = &self.fake_libc {
            config = config.with_stub_dir(dir.clone());
        }
        config
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Exit status for a verdict
pub fn exit_status(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Resolved => EXIT_RESOLVED,
        Verdict::Unresolved => EXIT_UNRESOLVED,
    }
}

/// Render what goes to stdout for a finished check
pub fn render(
    report: &CheckReport,
    format: OutputFormat,
    list: bool,
) -> Result<String, serde_json::Error> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)? + "\n",
        OutputFormat::Text if list => {
            let mut out = String::new();
            for unresolved in &report.unresolved {
                let _ = writeln!(
                    out,
                    "{}:{}: {}",
                    report.file.display(),
                    unresolved.line,
                    unresolved.name
                );
            }
            out
        }
        OutputFormat::Text => String::new(),
    };
    Ok(out)
}

/// Print a finished report and pick the exit status
pub fn emit(report: &CheckReport, format: OutputFormat, list: bool) -> u8 {
    match render(report, format, list) {
        Ok(out) => {
            print!("{out}");
            exit_status(report.verdict)
        }
        Err(err) => {
            eprintln!("headercheck: cannot render report: {err}");
            EXIT_FAILURE
        }
    }
}

/// Check the file named on the command line and print the result
pub fn run(cli: &Cli) -> ExitCode {
    let checker = HeaderChecker::with_config(cli.config());

    match checker.check_file(&cli.file) {
        Ok(report) => ExitCode::from(emit(&report, cli.format, cli.list)),
        Err(err) => {
            eprintln!("headercheck: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headercheck_c::UnresolvedDeclaration;

    fn report(unresolved: &[(&str, usize)]) -> CheckReport {
        CheckReport {
            file: PathBuf::from("lib.h"),
            verdict: if unresolved.is_empty() {
                Verdict::Resolved
            } else {
                Verdict::Unresolved
            },
            unresolved: unresolved
                .iter()
                .map(|(name, line)| UnresolvedDeclaration {
                    name: name.to_string(),
                    line: *line,
                })
                .collect(),
            error_count: 0,
            is_partial: false,
        }
    }

    #[test]
    fn test_passthrough_args_after_file() {
        let cli = Cli::try_parse_from([
            "headercheck",
            "--tolerant",
            "lib.h",
            "-Iinclude",
            "-DFOO=1",
            "-U",
            "BAR",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("lib.h"));
        assert_eq!(cli.cpp_args, vec!["-Iinclude", "-DFOO=1", "-U", "BAR"]);
        assert!(cli.tolerant);
    }

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::try_parse_from([
            "headercheck",
            "--cpp",
            "clang-cpp",
            "--fake-libc",
            "/opt/stubs",
            "--marker",
            "ANALYSIS",
            "x.h",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.preprocessor, "clang-cpp");
        assert_eq!(config.stub_dir, Some(PathBuf::from("/opt/stubs")));
        assert_eq!(config.marker_macro, "ANALYSIS");
        assert!(config.cpp_args.is_empty());
        assert!(!config.tolerant);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["headercheck", "x.h"]).unwrap();
        let config = cli.config();
        assert_eq!(config, CheckConfig::default());
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["headercheck"]).is_err());
    }

    #[test]
    fn test_log_levels() {
        let cli = Cli::try_parse_from(["headercheck", "--verbose", "--verbose", "x.h"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);

        let cli = Cli::try_parse_from(["headercheck", "--quiet", "x.h"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);

        assert!(Cli::try_parse_from(["headercheck", "--quiet", "--verbose", "x.h"]).is_err());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(Verdict::Resolved), 0);
        assert_eq!(exit_status(Verdict::Unresolved), 1);
        assert_ne!(EXIT_FAILURE, EXIT_UNRESOLVED);
    }

    #[test]
    fn test_render_text() {
        let unresolved = report(&[("alpha", 3), ("beta", 9)]);
        assert_eq!(render(&unresolved, OutputFormat::Text, false).unwrap(), "");
        assert_eq!(
            render(&unresolved, OutputFormat::Text, true).unwrap(),
            "lib.h:3: alpha\nlib.h:9: beta\n"
        );
        assert_eq!(render(&report(&[]), OutputFormat::Text, true).unwrap(), "");
    }

    #[test]
    fn test_render_json() {
        let out = render(&report(&[("alpha", 3)]), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["verdict"], "unresolved");
        assert_eq!(value["file"], "lib.h");
        assert_eq!(value["unresolved"][0]["line"], 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_unserializable_report_is_a_failure() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut bad = report(&[("alpha", 3)]);
        bad.file = PathBuf::from(OsStr::from_bytes(b"lib\xff.h"));

        assert!(render(&bad, OutputFormat::Json, false).is_err());
        assert_eq!(emit(&bad, OutputFormat::Json, false), EXIT_FAILURE);
        assert_eq!(emit(&bad, OutputFormat::Text, true), EXIT_UNRESOLVED);
    }
}
