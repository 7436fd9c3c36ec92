//! Integration tests for thread creation, extraction and the worker pool.

use std::collections::HashSet;
use std::sync::mpsc;

use poolkit::factory::mock::RecordingThreadFactory;
use poolkit::prelude::*;

fn unique_label() -> String {
    format!("it-{}", uuid::Uuid::new_v4().simple())
}

/// Test that N threads from one factory follow `<label>-pool-<K>-thread-<1..N>`.
#[test]
fn test_factory_names_sequence() {
    let label = unique_label();
    let factory = NamedThreadFactory::new(Some(&label), false);
    let k = factory.pool_number();

    let names: Vec<String> = (0..5)
        .map(|_| factory.new_thread(Box::new(|| {})).name().to_string())
        .collect();

    let expected: Vec<String> = (1..=5)
        .map(|n| format!("{}-pool-{}-thread-{}", label, k, n))
        .collect();
    assert_eq!(names, expected);
}

/// Test that started threads carry the factory's name, flags and group.
#[test]
fn test_started_thread_properties() {
    let group = ThreadGroup::new(unique_label());
    let factory = NamedThreadFactory::with_group(Some("props"), true, Arc::clone(&group));
    let (tx, rx) = mpsc::channel();

    let worker = factory
        .new_thread(Box::new(move || {
            tx.send((
                std::thread::current().name().map(str::to_string),
                ThreadPriority::current(),
                ThreadGroup::current().name().to_string(),
            ))
            .unwrap();
        }))
        .start()
        .unwrap();

    assert!(worker.is_daemon());
    assert_eq!(worker.priority(), ThreadPriority::NORM);
    let expected_name = worker.name().to_string();
    worker.join().unwrap();

    let (name, priority, group_name) = rx.recv().unwrap();
    assert_eq!(name, Some(expected_name));
    assert_eq!(priority, ThreadPriority::NORM);
    assert_eq!(group_name, group.name());
}

/// Test that separate factories never produce colliding names.
#[test]
fn test_distinct_factories_never_collide() {
    let factories: Vec<_> = (0..4)
        .map(|_| NamedThreadFactory::new(Some("shared-label"), false))
        .collect();

    let mut names = HashSet::new();
    for factory in &factories {
        for _ in 0..3 {
            let thread = factory.new_thread(Box::new(|| {}));
            assert!(names.insert(thread.name().to_string()));
        }
    }
    assert_eq!(names.len(), 12);
}

/// Test the documented extraction examples.
#[test]
fn test_extract_examples() {
    assert_eq!(extract_text("<p>Hello <b>world</b></p>").unwrap(), "Hello world");
    assert_eq!(extract_text("<p>Hello <b>world</p>").unwrap(), "Hello world");
    assert_eq!(extract_text("").unwrap(), "");
}

/// Test extraction of a realistic page.
#[test]
fn test_extract_page() {
    let html = r#"<!DOCTYPE html>
<html><head><title>News</title><style>body{color:red}</style></head>
<body><h1>Headline</h1><p class=lead>First &amp; <a href="/x">second</a><br>third
<script>track()</script></body></html>"#;

    let text = extract_text(html).unwrap();
    assert!(text.contains("News"));
    assert!(text.contains("Headline"));
    assert!(text.contains("First & second"));
    assert!(text.contains("third"));
    assert!(text.contains("body{color:red}"));
    assert!(text.contains("track()"));
    assert!(!text.contains('<'));

    let mut visible_only = TextExtractor::new(ExtractorConfig {
        include_raw_text: false,
        ..ExtractorConfig::default()
    });
    let text = visible_only.extract_text(html).unwrap();
    assert!(text.contains("Headline"));
    assert!(!text.contains("color:red"));
    assert!(!text.contains("track()"));
}

/// Test that pool workers are named by the configured prefix.
#[test]
fn test_pool_worker_names() {
    let label = unique_label();
    let pool = WorkerPool::builder()
        .config(
            WorkerPoolConfigBuilder::new()
                .worker_count(3)
                .thread_name_prefix(label.clone())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let names = pool.thread_names();
    assert_eq!(names.len(), 3);
    for (i, name) in names.iter().enumerate() {
        assert!(name.starts_with(&format!("{}-pool-", label)), "Got {}", name);
        assert!(name.ends_with(&format!("-thread-{}", i + 1)), "Got {}", name);
    }
    pool.shutdown();
}

/// Test that every submitted job completes before shutdown returns.
#[test]
fn test_pool_drains_queue_on_shutdown() {
    let factory = RecordingThreadFactory::new(Some("drain"), false);
    let pool = WorkerPool::builder()
        .config(WorkerPoolConfigBuilder::new().worker_count(2).build().unwrap())
        .factory(Box::new(factory.clone()))
        .build()
        .unwrap();

    let tickets: Vec<_> = (0..20)
        .map(|i| pool.submit(format!("<p>doc <b>{}</b></p>", i)).unwrap())
        .collect();
    pool.shutdown();

    for (i, ticket) in tickets.into_iter().enumerate() {
        assert_eq!(ticket.wait().unwrap(), format!("doc {}", i));
    }

    let stats = pool.stats();
    assert_eq!(stats.completed, 20);
    assert_eq!(stats.queued, 0);
    assert_eq!(factory.created(), 2);
}

/// Test that shutdown prevents new operations.
#[test]
fn test_shutdown_prevents_operations() {
    let pool = WorkerPool::builder().build().unwrap();
    pool.shutdown();

    let result = pool.submit("<p>late</p>");
    assert!(matches!(result, Err(PoolkitError::ShuttingDown)));
}

/// Test async extraction through the pool.
#[tokio::test]
async fn test_pool_async_extract() {
    let pool = WorkerPool::builder()
        .config(WorkerPoolConfigBuilder::new().worker_count(2).build().unwrap())
        .build()
        .unwrap()
        .into_shared();

    let text = pool.extract("<div><span>async</span> text</div>").await.unwrap();
    assert_eq!(text, "async text");
}

/// Test a ticket awaited with the tokio-test executor.
#[test]
fn test_ticket_recv_block_on() {
    let pool = WorkerPool::builder().build().unwrap();
    let ticket = pool.submit("<em>blocked on</em>").unwrap();

    let text = tokio_test::block_on(ticket.recv()).unwrap();
    assert_eq!(text, "blocked on");
}
