//! Integration tests for media discovery over real directory trees.

mod common;

use std::collections::BTreeSet;

use common::MediaTree;
use kourai::scanner::{ExtensionFilter, ModifiedFilter, PatternFilter, Scanner};
use kourai_parser::{Classifier, MediaEntity};
use std::time::{Duration, SystemTime};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

fn names(entities: &[MediaEntity]) -> BTreeSet<String> {
    entities
        .iter()
        .map(|e| {
            e.source_path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[tokio::test]
async fn excluded_directory_prunes_subtree() {
    let tree = MediaTree::new(&[
        "8AFD (2009).mkv",
        "nested/F00D (2001).mkv",
        "excluded-dir/01A9 (2005).mkv",
        "excluded-dir/nested/BE0F (2008).mkv",
    ]);

    let scanner = Scanner::new(Classifier::default())
        .with_filter(PatternFilter::new(["^excluded-dir$"]).unwrap());
    let (entities, stats) = scanner
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(
        names(&entities),
        BTreeSet::from(["8AFD (2009).mkv".to_string(), "F00D (2001).mkv".to_string()])
    );
    // Pruned files never reach a classification task.
    assert_eq!(stats.files_seen, 2);
    assert_eq!(stats.excluded, 0);
}

#[tokio::test]
async fn extension_and_sample_filters() {
    let tree = MediaTree::new(&[
        "Foobar.1999.2160p.WEB-DL.mkv",
        "Foobar.1999.2160p.WEB-DL.nfo",
        "Foobar.1999.sample.mkv",
        "Sample/Foobar.1999.mkv",
        "show/clobberin.time.s01e01.lets.go.AVI",
    ]);

    let scanner = Scanner::new(Classifier::default())
        .with_filter(ExtensionFilter::new(["avi", "mkv", "mp4"]))
        .with_filter(PatternFilter::default_excludes());
    let (entities, stats) = scanner
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(
        names(&entities),
        BTreeSet::from([
            "Foobar.1999.2160p.WEB-DL.mkv".to_string(),
            "clobberin.time.s01e01.lets.go.AVI".to_string(),
        ])
    );
    assert_eq!(stats.excluded, 2);
    assert_eq!(stats.classified, 2);
}

#[tokio::test]
async fn modified_filter_excludes_old_files() {
    let tree = MediaTree::new(&["Foobar (1999).mkv"]);

    let future = SystemTime::now() + Duration::from_secs(24 * 60 * 60);
    let scanner = Scanner::new(Classifier::default())
        .with_filter(ModifiedFilter::new(Some(future), None));
    let (entities, stats) = scanner
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert!(entities.is_empty());
    assert_eq!(stats.excluded, 1);
}

#[tokio::test]
async fn unclassifiable_files_are_dropped() {
    let tree = MediaTree::new(&["misc/no-match.mkv", "misc/Foobar (1999).mkv"]);

    let (entities, stats) = Scanner::new(Classifier::default())
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(entities.len(), 1);
    assert_eq!(stats.unclassified, 1);
}

#[tokio::test]
async fn cancelled_before_start_dispatches_nothing() {
    let tree = MediaTree::new(&["Foobar (1999).mkv", "Quux (2003).mkv"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let (entities, stats) = Scanner::new(Classifier::default())
        .discover(tree.path(), cancel)
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert!(entities.is_empty());
    assert_eq!(stats.files_seen, 0);
    assert!(stats.cancelled);
}

#[tokio::test]
async fn output_is_complete_under_low_concurrency() {
    let files: Vec<String> = (0..50).map(|i| format!("d{}/Film {i} (19{:02}).mkv", i % 5, i + 40)).collect();
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    let tree = MediaTree::new(&refs);

    let (entities, stats) = Scanner::new(Classifier::default())
        .with_concurrency(1)
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(entities.len(), 50);
    assert_eq!(stats.classified, 50);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_files_are_skipped() {
    let outside = MediaTree::new(&["Linked.2001.mkv"]);
    let tree = MediaTree::new(&["src/Real.2002.mkv"]);
    std::os::unix::fs::symlink(
        outside.path().join("Linked.2001.mkv"),
        tree.path().join("src/Linked.2001.mkv"),
    )
    .unwrap();

    let (entities, stats) = Scanner::new(Classifier::default())
        .discover(tree.path().join("src"), CancellationToken::new())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(names(&entities), BTreeSet::from(["Real.2002.mkv".to_string()]));
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.classified, 1);
}

#[tokio::test]
async fn entities_stream_from_parts() {
    let tree = MediaTree::new(&["Foobar (1999).mkv", "show.s01e01.mkv"]);

    let (stream, handle) = Scanner::new(Classifier::default())
        .discover(tree.path(), CancellationToken::new())
        .unwrap()
        .into_parts();
    let episodes = stream.filter(|e| e.is_episode()).collect::<Vec<_>>().await;
    let stats = handle.await.unwrap();

    assert_eq!(episodes.len(), 1);
    assert_eq!(stats.classified, 2);
}
