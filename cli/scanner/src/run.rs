//! Main execution logic for bt-scan CLI.

use bt_cli_common::{format_bytes, format_number, format_size};
use bt_error::{BtError, Result};
use bt_scanner::{DiscardSink, S3Bucket, S3Config, ScanConfig, ScanReport, Scanner, WriterSink};
use bt_types::{DateRange, MatchFilter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::args::Cli;

/// Endpoint variable honoured when `--s3-endpoint`/`BT_S3_ENDPOINT` is unset.
const LEGACY_ENDPOINT_VAR: &str = "CUSTOM_ENDPOINT";

/// Build the S3 configuration from CLI arguments.
pub fn s3_config(args: &Cli) -> S3Config {
    let mut s3_config = S3Config::new(&args.bucket)
        .with_region(&args.region)
        .with_page_size(args.page_size)
        .with_timeout(args.timeout);

    let endpoint = args
        .s3_endpoint
        .clone()
        .or_else(|| std::env::var(LEGACY_ENDPOINT_VAR).ok())
        .filter(|endpoint| !endpoint.is_empty());
    if let Some(endpoint) = endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
        if let Some(token) = &args.session_token {
            s3_config = s3_config.with_session_token(token);
        }
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    s3_config
}

/// Build the scan configuration from CLI arguments.
pub fn scan_config(args: &Cli) -> Result<ScanConfig> {
    let config = ScanConfig::new(&args.bucket)
        .with_filter(MatchFilter::from_option(args.filter.clone()))
        .with_chunk_size(args.chunk_size)
        .with_stream_content(args.streams_content())
        .with_key_prefix(&args.key_prefix);

    let config = match (&args.prefix, args.range, args.year) {
        (_, Some(range), _) => config.with_date_range(range),
        (_, None, Some(year)) => config.with_date_range(DateRange::year(year)?),
        (Some(prefix), None, None) => config.with_prefix(prefix),
        (None, None, None) => config,
    };

    config.validate()?;
    Ok(config)
}

/// Execute a scan with the provided arguments.
pub async fn execute(args: &Cli, cancel: &CancellationToken) -> Result<ScanReport> {
    let config = scan_config(args)?;
    let bucket = S3Bucket::connect(&s3_config(args)).await?;

    debug!(
        bucket = %args.bucket,
        target = ?config.target,
        filter = %config.filter.description(),
        "Starting scan"
    );

    let scanner = Scanner::new(bucket, config)?;

    if args.streams_content() {
        let mut sink = WriterSink::stdout().with_headers(args.show_headers);
        scanner.scan_with_stats(&mut sink, cancel).await
    } else {
        scanner.scan_with_stats(&mut DiscardSink::new(), cancel).await
    }
}

/// Print the outcome of a successful scan.
pub fn report(args: &Cli, report: &ScanReport) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(&report.result)
            .map_err(|e| BtError::Config(format!("JSON serialization failed: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let stats = &report.stats;

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Prefixes scanned: {}", format_number(stats.prefixes_scanned as u64));
    eprintln!("  Objects listed:   {}", format_number(stats.objects_listed as u64));
    eprintln!("  Objects matched:  {}", format_number(stats.objects_matched as u64));
    eprintln!(
        "  Total size:       {} ({} bytes)",
        format_size(report.result.total_size),
        report.result.total_size
    );
    if args.streams_content() {
        eprintln!("  Bytes streamed:   {}", format_bytes(stats.bytes_streamed));
    }

    if let Some(duration) = stats.duration() {
        eprintln!(
            "  Duration:         {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );

        if let Some(ops) = stats.objects_per_second() {
            eprintln!("  Throughput:       {ops:.1} objects/sec");
        }
    }

    Ok(())
}

/// Process exit code for a failed scan.
pub fn exit_code(error: &BtError) -> i32 {
    match error {
        BtError::Config(_) | BtError::InvalidRange { .. } => 2,
        BtError::Listing { .. } => 3,
        BtError::StreamRead { .. } => 4,
        BtError::Cancelled => 130,
        _ => 1,
    }
}
