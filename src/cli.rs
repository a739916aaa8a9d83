//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Insight Factory - asynchronous sales-report pipeline
///
/// Aggregate sales over a date range, generate an executive summary
/// (LLM-backed with a deterministic fallback), and dispatch the report
/// by email.
///
/// Examples:
///   insight-factory --data sales.json --from 2025-11-01 --to 2025-11-07 --email-to ceo@example.com
///   insight-factory --data sales.json --from 2025-11-01 --to 2025-11-07 --email-to ceo@example.com --report-branch Miraflores
///   insight-factory --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the sales data file (JSON array of sale records)
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub data: Option<PathBuf>,

    /// Start of the reporting period (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE", required_unless_present = "init_config")]
    pub from: Option<NaiveDate>,

    /// End of the reporting period (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE", required_unless_present = "init_config")]
    pub to: Option<NaiveDate>,

    /// Destination address for the report email
    #[arg(
        short,
        long,
        value_name = "ADDRESS",
        required_unless_present = "init_config"
    )]
    pub email_to: Option<String>,

    /// Restrict the report to one branch (case-sensitive)
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub report_branch: Option<String>,

    /// Chat-completions endpoint URL
    ///
    /// Can also be set via MODELS_URL env var or .insight-factory.toml.
    #[arg(long, value_name = "URL", env = "MODELS_URL")]
    pub models_url: Option<String>,

    /// Model identifier for the narrative summary
    #[arg(short, long, value_name = "ID", env = "MODEL_ID")]
    pub model: Option<String>,

    /// Bearer token for the model endpoint
    ///
    /// Without a token (or with the test-token placeholder) the report
    /// still goes out, built from the deterministic template.
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Model request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory where outbound messages are spooled
    #[arg(short, long, value_name = "DIR")]
    pub outbox: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .insight-factory.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .insight-factory.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.email_to.as_deref() {
            Some(address) if address.contains('@') => {}
            Some(_) => return Err("Destination address must contain '@'".to_string()),
            None => return Err("--email-to is required".to_string()),
        }

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(format!(
                    "--from ({}) must not be after --to ({})",
                    from, to
                ));
            }
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Sales data file does not exist: {}", data.display()));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            from: Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2025, 11, 7).unwrap()),
            email_to: Some("ceo@example.com".to_string()),
            report_branch: None,
            models_url: None,
            model: None,
            token: None,
            timeout: None,
            outbox: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_bad_email() {
        let mut args = make_args();
        args.email_to = Some("not-an-address".to_string());
        assert!(args.validate().is_err());

        args.email_to = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_inverted_range() {
        let mut args = make_args();
        args.from = Some(NaiveDate::from_ymd_opt(2025, 11, 7).unwrap());
        args.to = Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.init_config = true;
        args.email_to = None;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
