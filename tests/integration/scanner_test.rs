//! Scanner integration tests using LocalStack.
//!
//! These tests verify listing, aggregation and content streaming against a
//! real S3 API.

use bt_error::BtError;
use bt_scanner::{
    ContentReader, S3Bucket, S3Config, ScanConfig, Scanner, WriterSink, list_objects,
};
use bt_types::{DateRange, MatchFilter, ObjectDescriptor};
use futures::TryStreamExt;
use integration_tests::localstack::{TEST_ACCESS_KEY, TEST_SECRET_KEY};
use integration_tests::{LocalStackTestContext, generate_client_list};
use tokio_util::sync::CancellationToken;

async fn connect(ctx: &LocalStackTestContext, bucket: &str, page_size: i32) -> S3Bucket {
    let config = S3Config::new(bucket)
        .with_endpoint(&ctx.endpoint)
        .with_region(&ctx.region)
        .with_credentials(TEST_ACCESS_KEY, TEST_SECRET_KEY)
        .with_page_size(page_size);

    S3Bucket::connect(&config).await.unwrap()
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_scan_date_range_with_filter() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bt-scan-date-range";
    ctx.create_bucket(bucket).await.unwrap();

    ctx.put_object(bucket, "2024/01/01/list_clients_a.json", vec![b'a'; 100])
        .await
        .unwrap();
    ctx.put_object(bucket, "2024/01/01/other.json", vec![b'o'; 50])
        .await
        .unwrap();
    ctx.put_object(bucket, "2024/01/02/list_clients_b.json", vec![b'b'; 200])
        .await
        .unwrap();
    ctx.put_object(bucket, "2024/01/03/list_clients_c.json", vec![b'c'; 400])
        .await
        .unwrap();

    let config = ScanConfig::new(bucket)
        .with_date_range(DateRange::parse("2024-01-01..2024-01-03").unwrap())
        .with_filter(MatchFilter::substring("list_clients"));
    let scanner = Scanner::new(connect(&ctx, bucket, 1000).await, config).unwrap();

    let mut sink = WriterSink::new(Vec::new());
    let report = scanner
        .scan_with_stats(&mut sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.result.total_size, 300);
    assert_eq!(
        report.result.matched_keys,
        vec![
            "2024/01/01/list_clients_a.json",
            "2024/01/02/list_clients_b.json",
        ]
    );
    assert_eq!(report.stats.objects_listed, 3);
    assert_eq!(report.stats.bytes_streamed, 300);

    let mut expected = vec![b'a'; 100];
    expected.extend(vec![b'b'; 200]);
    assert_eq!(sink.into_inner(), expected);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_listing_follows_continuation_tokens() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bt-scan-pagination";
    ctx.create_bucket(bucket).await.unwrap();

    for i in 0..7 {
        ctx.put_object(bucket, &format!("2024/05/06/part-{i:02}.json"), vec![0u8; 10])
            .await
            .unwrap();
    }

    let s3 = connect(&ctx, bucket, 3).await;
    let cancel = CancellationToken::new();

    let objects: Vec<ObjectDescriptor> = list_objects(&s3, "2024/05/06", &cancel)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(objects.len(), 7);
    assert_eq!(objects[0].key(), "2024/05/06/part-00.json");
    assert_eq!(objects.iter().map(|o| o.size()).sum::<i64>(), 70);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_large_object_streams_in_chunks() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bt-scan-large-object";
    ctx.create_bucket(bucket).await.unwrap();

    let data: Vec<u8> = (0..200_000usize).map(|i| (i % 251) as u8).collect();
    ctx.put_object(bucket, "2024/01/01/big.bin", data.clone())
        .await
        .unwrap();

    let s3 = connect(&ctx, bucket, 1000).await;
    let cancel = CancellationToken::new();
    let mut stream = ContentReader::default()
        .open(&s3, "2024/01/01/big.bin", &cancel)
        .await
        .unwrap();

    let mut chunks = Vec::new();
    loop {
        let chunk = stream.read_chunk(&cancel).await.unwrap();
        let is_final = chunk.is_final;
        chunks.push(chunk);
        if is_final {
            break;
        }
    }

    assert_eq!(chunks.len(), data.len().div_ceil(65536));
    assert!(chunks[..chunks.len() - 1].iter().all(|c| !c.is_final && c.len() == 65536));

    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.bytes.iter().copied()).collect();
    assert_eq!(joined, data);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_folder_size_sizes_only() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bt-scan-folder-size";
    ctx.create_bucket(bucket).await.unwrap();

    let doc = generate_client_list(25);
    let doc_len = doc.len() as i64;
    ctx.put_object(bucket, "reports/2024/a.json", doc.clone())
        .await
        .unwrap();
    ctx.put_object(bucket, "reports/2024/b.json", doc).await.unwrap();
    ctx.put_object(bucket, "other/c.json", vec![0u8; 10])
        .await
        .unwrap();

    let config = ScanConfig::new(bucket)
        .with_prefix("reports/")
        .with_stream_content(false);
    let scanner = Scanner::new(connect(&ctx, bucket, 1000).await, config).unwrap();

    let mut sink = WriterSink::new(Vec::new());
    let result = scanner
        .scan(&mut sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.total_size, 2 * doc_len);
    assert_eq!(result.matched_count(), 2);
    assert!(sink.into_inner().is_empty());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_is_listing_error() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bt-scan-does-not-exist";
    let config = ScanConfig::new(bucket).with_prefix("2024/01/01");
    let scanner = Scanner::new(connect(&ctx, bucket, 1000).await, config).unwrap();

    let result = scanner
        .scan(&mut WriterSink::new(Vec::new()), &CancellationToken::new())
        .await;

    match result {
        Err(e @ BtError::Listing { .. }) => {
            assert_eq!(e.category(), bt_error::ErrorCategory::Permanent);
        }
        other => panic!("expected listing error, got {other:?}"),
    }
}
