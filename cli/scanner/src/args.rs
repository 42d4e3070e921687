//! CLI argument definitions for bt-scan.

use bt_cli_common::LogLevel;
use bt_types::DateRange;
use clap::{ArgGroup, Parser};

/// Size and content scanner for date-partitioned S3 buckets.
///
/// Lists every object under a prefix, or under one `YYYY/MM/DD` prefix per
/// day of a date range, totals the sizes of objects whose key matches the
/// filter and streams their content to stdout.
///
/// ## Examples
///
/// Total size of a folder:
///   bt-scan -b my-bucket --prefix 2024/03/ --sizes-only
///
/// Stream a year of client lists:
///   bt-scan -b my-bucket --year 2024 --filter list_clients
///
/// Against LocalStack, result as JSON:
///   bt-scan -b my-bucket --range 2024-01-01..2024-02-01 \
///       --s3-endpoint http://localhost:4566 --json
#[derive(Parser, Debug)]
#[command(name = "bt-scan")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("target").args(["prefix", "range", "year"])))]
pub struct Cli {
    // === Target ===
    /// S3 bucket name
    #[arg(short, long, env = "BT_BUCKET")]
    pub bucket: String,

    /// Scan a single key prefix (empty scans the whole bucket)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Scan one prefix per day of YYYY-MM-DD..YYYY-MM-DD (end exclusive)
    #[arg(long, value_parser = parse_range)]
    pub range: Option<DateRange>,

    /// Scan one prefix per day of a calendar year
    #[arg(long)]
    pub year: Option<i32>,

    /// Static text prepended to every date prefix (e.g. "logs/")
    #[arg(long, default_value = "")]
    pub key_prefix: String,

    // === Scan Options ===
    /// Only count objects whose key contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Bytes per content chunk (must be >= 1)
    #[arg(long, default_value = "65536", value_parser = parse_positive_usize)]
    pub chunk_size: usize,

    /// Total sizes without reading object content
    #[arg(long)]
    pub sizes_only: bool,

    /// Print a header line before each object's content
    #[arg(long)]
    pub show_headers: bool,

    /// Print the result as JSON to stdout (implies --sizes-only)
    #[arg(long)]
    pub json: bool,

    // === S3 Configuration ===
    /// Custom S3 endpoint URL (LocalStack, MinIO)
    #[arg(long, env = "BT_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", requires = "secret_key")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Objects per listing request (1-1000)
    #[arg(long, default_value = "1000", value_parser = parse_page_size)]
    pub page_size: i32,

    /// Connect and read timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Whether object content should be streamed to stdout.
    pub fn streams_content(&self) -> bool {
        !self.sizes_only && !self.json
    }
}

fn parse_range(s: &str) -> Result<DateRange, String> {
    DateRange::parse(s).map_err(|e| e.to_string())
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err(format!("{value} is not in 1.."));
    }
    Ok(value)
}

/// Parse a listing page size (1-1000).
fn parse_page_size(s: &str) -> Result<i32, String> {
    let value: i32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if !(1..=1000).contains(&value) {
        return Err(format!("{value} is not in 1..=1000"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_arg() {
        let cli = Cli::try_parse_from([
            "bt-scan",
            "-b",
            "logs",
            "--range",
            "2024-01-01..2024-01-08",
            "--filter",
            "list_clients",
        ])
        .unwrap();

        assert_eq!(cli.bucket, "logs");
        assert_eq!(cli.range.unwrap().len_days(), 7);
        assert_eq!(cli.filter.as_deref(), Some("list_clients"));
        assert_eq!(cli.chunk_size, 65536);
        assert!(cli.streams_content());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = Cli::try_parse_from([
            "bt-scan",
            "-b",
            "logs",
            "--range",
            "2024-02-01..2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prefix_not_read_from_environment() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("BT_PREFIX", "base/") };
        let result = Cli::try_parse_from(["bt-scan", "-b", "logs", "--year", "2024"]);
        unsafe { std::env::remove_var("BT_PREFIX") };

        let cli = result.unwrap();
        assert_eq!(cli.year, Some(2024));
        assert!(cli.prefix.is_none());
    }

    #[test]
    fn test_targets_conflict() {
        let result = Cli::try_parse_from([
            "bt-scan", "-b", "logs", "--year", "2024", "--prefix", "2024/",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_implies_sizes_only() {
        let cli = Cli::try_parse_from(["bt-scan", "-b", "logs", "--json"]).unwrap();
        assert!(!cli.streams_content());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(parse_positive_usize("0").is_err());
        assert_eq!(parse_positive_usize("4096"), Ok(4096));
        assert!(parse_page_size("1001").is_err());
        assert_eq!(parse_page_size("250"), Ok(250));
    }
}
