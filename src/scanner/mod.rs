//! Media discovery.
//!
//! A [`Scanner`] walks a source root, prunes excluded directories, and
//! classifies every remaining file on its own task. Classified entities come
//! out of a single channel in completion order, not traversal order.

pub mod filters;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kourai_common::{Error, Result};
use kourai_parser::{Classifier, MediaEntity};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

pub use filters::{
    CountryFilter, EntryInfo, ExtensionFilter, FileFilter, MediaFilter, ModifiedFilter,
    PatternFilter,
};

/// Capacity of the walker-to-dispatcher and entity channels.
const CHANNEL_CAPACITY: usize = 256;

/// Default number of files classified concurrently.
pub fn default_concurrency() -> usize {
    (num_cpus::get() * 4).max(4)
}

/// Counters for one discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files handed to a classification task.
    pub files_seen: usize,
    /// Files dropped by a file filter.
    pub excluded: usize,
    /// Files that were neither a movie nor an episode.
    pub unclassified: usize,
    /// Files sent out as entities.
    pub classified: usize,
    /// Files that could not be stat'ed, or were not regular files
    /// (symlinks included).
    pub skipped: usize,
    /// Entries the walk could not read.
    pub walk_errors: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl std::ops::AddAssign for ScanStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files_seen += rhs.files_seen;
        self.excluded += rhs.excluded;
        self.unclassified += rhs.unclassified;
        self.classified += rhs.classified;
        self.skipped += rhs.skipped;
        self.walk_errors += rhs.walk_errors;
        self.cancelled |= rhs.cancelled;
    }
}

enum FileOutcome {
    Classified,
    Excluded,
    Unclassified,
    Skipped,
}

/// An in-progress discovery run.
///
/// Entities arrive on [`Discovery::next`] until every file task has
/// finished; the counters are available from [`Discovery::finish`].
#[derive(Debug)]
pub struct Discovery {
    entities: mpsc::Receiver<MediaEntity>,
    handle: JoinHandle<ScanStats>,
}

impl Discovery {
    /// Next classified entity, or `None` once the run is over.
    pub async fn next(&mut self) -> Option<MediaEntity> {
        self.entities.recv().await
    }

    /// Split into an entity stream and the handle yielding the counters.
    pub fn into_parts(self) -> (ReceiverStream<MediaEntity>, JoinHandle<ScanStats>) {
        (ReceiverStream::new(self.entities), self.handle)
    }

    /// Wait for the run to end and return its counters.
    ///
    /// Entities not yet received are discarded.
    pub async fn finish(self) -> Result<ScanStats> {
        drop(self.entities);
        self.handle
            .await
            .map_err(|e| Error::internal(format!("discovery task failed: {e}")))
    }

    /// Receive every entity, then return them with the counters.
    pub async fn collect(mut self) -> Result<(Vec<MediaEntity>, ScanStats)> {
        let mut entities = Vec::new();
        while let Some(entity) = self.next().await {
            entities.push(entity);
        }
        let stats = self.finish().await?;
        Ok((entities, stats))
    }
}

/// Walks source roots and classifies the files found there.
#[derive(Debug, Clone)]
pub struct Scanner {
    filters: Vec<Arc<dyn FileFilter>>,
    classifier: Classifier,
    concurrency: usize,
}

impl Scanner {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            filters: Vec::new(),
            classifier,
            concurrency: default_concurrency(),
        }
    }

    /// Add a file filter.
    pub fn with_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Add an already shared file filter.
    pub fn with_shared_filter(mut self, filter: Arc<dyn FileFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Maximum number of files classified at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start discovering media under `root`.
    ///
    /// Directories excluded by any filter are pruned with their whole
    /// subtree; `root` itself is always entered. Once `cancel` fires no new
    /// file is dispatched, and files already being classified still finish.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when `root` cannot be stat'ed. Every later
    /// failure is per file and only shows up in the counters.
    pub fn discover(&self, root: impl AsRef<Path>, cancel: CancellationToken) -> Result<Discovery> {
        let root = root.as_ref().to_path_buf();
        if let Err(e) = std::fs::metadata(&root) {
            error!(root = %root.display(), error = %e, "Cannot read source root");
            return Err(Error::Io(e));
        }

        let filters: Arc<[Arc<dyn FileFilter>]> = self.filters.clone().into();
        let (path_tx, path_rx) = mpsc::channel::<PathBuf>(CHANNEL_CAPACITY);
        let (entity_tx, entity_rx) = mpsc::channel::<MediaEntity>(CHANNEL_CAPACITY);

        let walker = {
            let root = root.clone();
            let filters = filters.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || walk(&root, &filters, &path_tx, &cancel))
        };

        let dispatcher = Dispatcher {
            filters,
            classifier: Arc::new(self.classifier.clone()),
            semaphore: Arc::new(Semaphore::new(self.concurrency)),
            entities: entity_tx,
        };
        let handle = tokio::spawn(async move {
            let mut stats = dispatcher.run(path_rx, walker, &cancel).await;
            stats.cancelled = cancel.is_cancelled();
            info!(
                root = %root.display(),
                seen = stats.files_seen,
                classified = stats.classified,
                excluded = stats.excluded,
                unclassified = stats.unclassified,
                "Discovery finished"
            );
            stats
        });

        Ok(Discovery {
            entities: entity_rx,
            handle,
        })
    }
}

/// Synchronous walk feeding candidate files to the dispatcher.
///
/// Returns the number of unreadable entries.
fn walk(
    root: &Path,
    filters: &[Arc<dyn FileFilter>],
    paths: &mpsc::Sender<PathBuf>,
    cancel: &CancellationToken,
) -> usize {
    let mut walk_errors = 0;
    let entries = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !prune(entry, filters));

    for entry in entries {
        if cancel.is_cancelled() {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Walk error");
                walk_errors += 1;
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if paths.blocking_send(entry.into_path()).is_err() {
            break;
        }
    }
    walk_errors
}

fn prune(entry: &DirEntry, filters: &[Arc<dyn FileFilter>]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let info = EntryInfo {
        path: entry.path(),
        is_dir: true,
        modified: entry.metadata().ok().and_then(|m| m.modified().ok()),
    };
    let pruned = filters.iter().any(|f| f.excludes(&info));
    if pruned {
        debug!(path = %entry.path().display(), "Pruning directory");
    }
    pruned
}

struct Dispatcher {
    filters: Arc<[Arc<dyn FileFilter>]>,
    classifier: Arc<Classifier>,
    semaphore: Arc<Semaphore>,
    entities: mpsc::Sender<MediaEntity>,
}

impl Dispatcher {
    async fn run(
        self,
        mut paths: mpsc::Receiver<PathBuf>,
        walker: JoinHandle<usize>,
        cancel: &CancellationToken,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        let mut tasks = JoinSet::new();

        loop {
            let path = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = paths.recv() => match next {
                    Some(path) => path,
                    None => break,
                },
            };
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = self.semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            stats.files_seen += 1;
            let filters = self.filters.clone();
            let classifier = self.classifier.clone();
            let entities = self.entities.clone();
            tasks.spawn(async move {
                let _permit = permit;
                process_file(path, &filters, &classifier, &entities).await
            });
        }

        // Unblock the walker if it is waiting on a full channel.
        drop(paths);
        match walker.await {
            Ok(errors) => stats.walk_errors = errors,
            Err(e) => {
                warn!(error = %e, "Walker task failed");
                stats.walk_errors += 1;
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(FileOutcome::Classified) => stats.classified += 1,
                Ok(FileOutcome::Excluded) => stats.excluded += 1,
                Ok(FileOutcome::Unclassified) => stats.unclassified += 1,
                Ok(FileOutcome::Skipped) => stats.skipped += 1,
                Err(e) => {
                    warn!(error = %e, "File task failed");
                    stats.skipped += 1;
                }
            }
        }
        stats
    }
}

async fn process_file(
    path: PathBuf,
    filters: &[Arc<dyn FileFilter>],
    classifier: &Classifier,
    entities: &mpsc::Sender<MediaEntity>,
) -> FileOutcome {
    // Symlinks are not followed: a hardlink to one would link the symlink.
    let metadata = match tokio::fs::symlink_metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Cannot stat file");
            return FileOutcome::Skipped;
        }
    };
    if !metadata.is_file() {
        return FileOutcome::Skipped;
    }

    let info = EntryInfo {
        path: &path,
        is_dir: false,
        modified: metadata.modified().ok(),
    };
    if let Some(filter) = filters.iter().find(|f| f.excludes(&info)) {
        debug!(path = %path.display(), ?filter, "Excluded");
        return FileOutcome::Excluded;
    }

    match classifier.classify(&path) {
        Ok(entity) => {
            // A closed receiver only means the consumer stopped listening.
            let _ = entities.send(entity).await;
            FileOutcome::Classified
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Unclassified");
            FileOutcome::Unclassified
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[tokio::test]
    async fn test_discover_classifies_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Foobar.1999.2160p.WEB-DL.mkv");
        touch(dir.path(), "shows/clobberin.time.s01e01.lets.go.mkv");
        touch(dir.path(), "misc/readme.txt");

        let scanner = Scanner::new(Classifier::default()).with_concurrency(2);
        let (mut entities, stats) = scanner
            .discover(dir.path(), CancellationToken::new())
            .unwrap()
            .collect()
            .await
            .unwrap();

        entities.sort_by(|a, b| a.title().cmp(b.title()));
        let titles: Vec<&str> = entities.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["Clobberin Time", "Foobar"]);
        assert_eq!(stats.files_seen, 3);
        assert_eq!(stats.classified, 2);
        assert_eq!(stats.unclassified, 1);
        assert!(!stats.cancelled);
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Scanner::new(Classifier::default())
            .discover(dir.path().join("nope"), CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_root_is_never_pruned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("sample");
        touch(&root, "Foobar (1999).mkv");

        let scanner = Scanner::new(Classifier::default()).with_filter(PatternFilter::default_excludes());
        let (entities, _) = scanner
            .discover(&root, CancellationToken::new())
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_stats_add() {
        let mut a = ScanStats {
            files_seen: 1,
            ..Default::default()
        };
        a += ScanStats {
            files_seen: 2,
            cancelled: true,
            ..Default::default()
        };
        assert_eq!(a.files_seen, 3);
        assert!(a.cancelled);
    }
}
