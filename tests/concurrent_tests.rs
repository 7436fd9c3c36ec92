//! Concurrent access tests for the factory, extractors and pool.

use std::collections::HashSet;

use poolkit::prelude::*;
use tokio::task::JoinSet;

/// Test concurrent extraction through a shared pool.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pool_extraction() {
    let _ = env_logger::builder().is_test(true).try_init();

    let pool: SharedWorkerPool = WorkerPool::builder()
        .config(WorkerPoolConfigBuilder::new().worker_count(4).build().unwrap())
        .build()
        .unwrap()
        .into_shared();

    let mut tasks = JoinSet::new();

    for i in 0..10 {
        let pool = Arc::clone(&pool);
        tasks.spawn(async move {
            for j in 0..20 {
                let html = format!("<p>task {} <i>doc {}</i></p>", i, j);
                let text = pool.extract(html).await.unwrap();
                assert_eq!(text, format!("task {} doc {}", i, j));
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert!(result.is_ok(), "Task should complete without panic");
    }

    assert_eq!(pool.stats().completed, 200);
}

/// Test that extractors owned by different threads never interfere.
#[test]
fn test_concurrent_extractors_do_not_interfere() {
    let factory = NamedThreadFactory::new(Some("extract"), false);
    let (tx, rx) = std::sync::mpsc::channel();

    let workers: Vec<_> = (0..6)
        .map(|i| {
            let tx = tx.clone();
            factory
                .new_thread(Box::new(move || {
                    let mut extractor = TextExtractor::with_defaults();
                    for j in 0..100 {
                        let html = format!("<li>worker {}</li><li>item {}</li>", i, j);
                        let text = extractor.extract_text(&html).unwrap();
                        tx.send(text == format!("worker {}item {}", i, j)).unwrap();
                    }
                }))
                .start()
                .unwrap()
        })
        .collect();
    drop(tx);

    for worker in workers {
        worker.join().unwrap();
    }
    let results: Vec<bool> = rx.iter().collect();
    assert_eq!(results.len(), 600);
    assert!(results.iter().all(|ok| *ok));
}

/// Test that a factory shared across threads hands out unique names.
#[test]
fn test_shared_factory_unique_names() {
    let factory = Arc::new(NamedThreadFactory::new(Some("shared"), true));

    let callers: Vec<_> = (0..4)
        .map(|_| {
            let factory = Arc::clone(&factory);
            std::thread::spawn(move || {
                (0..25)
                    .map(|_| factory.new_thread(Box::new(|| {})).name().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut names = HashSet::new();
    for caller in callers {
        for name in caller.join().unwrap() {
            assert!(names.insert(name));
        }
    }

    let expected: HashSet<String> = (1..=100)
        .map(|n| format!("{}{}", factory.name_prefix(), n))
        .collect();
    assert_eq!(names, expected);
}
