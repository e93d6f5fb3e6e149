//! Source roots in, planned links out.
//!
//! The orchestrator discovers media under each source root in turn and
//! hands every entity to its own task, which applies type exclusion,
//! metadata resolution, and media filters before planning the link. Links
//! come out of one channel with no ordering guarantee.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use kourai_common::{Error, Result};
use kourai_parser::{Classifier, MediaEntity, MediaKind};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::link::Link;
use crate::metadata::Resolver;
use crate::scanner::{
    default_concurrency, FileFilter, MediaFilter, PatternFilter, ScanStats, Scanner,
};

const LINK_CHANNEL_CAPACITY: usize = 256;

/// Everything a link run needs besides the catalog.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Library root every target is joined under.
    pub destination: PathBuf,
    /// Roots to discover media in, processed in order.
    pub sources: Vec<PathBuf>,
    pub file_filters: Vec<Arc<dyn FileFilter>>,
    pub media_filters: Vec<Arc<dyn MediaFilter>>,
    /// Kinds dropped right after classification.
    pub exclude_kinds: HashSet<MediaKind>,
    pub classifier: Classifier,
    /// Entities processed at once, and files classified at once per root.
    pub concurrency: usize,
}

impl LinkOptions {
    /// Options linking `sources` into `destination`, with the default
    /// sample-file exclusion already in place.
    pub fn new(destination: impl Into<PathBuf>, sources: Vec<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            sources,
            file_filters: vec![Arc::new(PatternFilter::default_excludes())],
            media_filters: Vec::new(),
            exclude_kinds: HashSet::new(),
            classifier: Classifier::default(),
            concurrency: default_concurrency(),
        }
    }

    pub fn with_file_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.file_filters.push(Arc::new(filter));
        self
    }

    pub fn with_media_filter(mut self, filter: impl MediaFilter + 'static) -> Self {
        self.media_filters.push(Arc::new(filter));
        self
    }

    pub fn exclude_kind(mut self, kind: MediaKind) -> Self {
        self.exclude_kinds.insert(kind);
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    fn scanner(&self) -> Scanner {
        self.file_filters
            .iter()
            .cloned()
            .fold(Scanner::new(self.classifier.clone()), Scanner::with_shared_filter)
            .with_concurrency(self.concurrency)
    }
}

/// Counters for one link run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Discovery counters summed over all roots.
    pub scan: ScanStats,
    /// Roots that could not be read.
    pub failed_roots: usize,
    /// Entities dropped by kind before any lookup.
    pub kind_excluded: usize,
    /// Episodes dropped for having no series name.
    pub untitled: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Entities dropped by a media filter.
    pub filtered: usize,
    /// Links sent to the caller.
    pub planned: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files seen, {} classified, {} excluded, {} unclassified, {} resolved, \
             {} unresolved, {} filtered, {} untitled, {} links planned, \
             {} roots unreadable",
            self.scan.files_seen,
            self.scan.classified,
            self.scan.excluded + self.kind_excluded,
            self.scan.unclassified,
            self.resolved,
            self.unresolved,
            self.filtered,
            self.untitled,
            self.planned,
            self.failed_roots,
        )
    }
}

enum EntityOutcome {
    KindExcluded,
    Untitled,
    Filtered { resolved: Option<bool> },
    Planned { resolved: Option<bool> },
}

/// A link run in progress.
#[derive(Debug)]
pub struct LinkRun {
    links: mpsc::Receiver<Link>,
    handle: JoinHandle<RunSummary>,
}

impl LinkRun {
    /// Next planned link, or `None` once the run is over.
    pub async fn next(&mut self) -> Option<Link> {
        self.links.recv().await
    }

    pub fn into_parts(self) -> (ReceiverStream<Link>, JoinHandle<RunSummary>) {
        (ReceiverStream::new(self.links), self.handle)
    }

    /// Wait for the run to end. Links not yet received are discarded.
    pub async fn finish(self) -> Result<RunSummary> {
        drop(self.links);
        self.handle
            .await
            .map_err(|e| Error::internal(format!("link run failed: {e}")))
    }

    /// Receive every link, then return them with the summary.
    pub async fn collect(mut self) -> Result<(Vec<Link>, RunSummary)> {
        let mut links = Vec::new();
        while let Some(link) = self.next().await {
            links.push(link);
        }
        let summary = self.finish().await?;
        Ok((links, summary))
    }
}

/// Wires discovery, resolution, and link planning together.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    options: Arc<LinkOptions>,
    resolver: Option<Resolver>,
}

impl Orchestrator {
    /// Without a resolver, entities keep their parsed titles.
    pub fn new(options: LinkOptions, resolver: Option<Resolver>) -> Self {
        Self {
            options: Arc::new(options),
            resolver,
        }
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Start the run.
    ///
    /// An unreadable source root is logged and skipped. Once `cancel` fires
    /// no further files are dispatched; entities already discovered are
    /// still resolved and planned.
    pub fn run(&self, cancel: CancellationToken) -> LinkRun {
        let (tx, rx) = mpsc::channel(LINK_CHANNEL_CAPACITY);
        let this = self.clone();
        let handle = tokio::spawn(async move { this.drive(tx, cancel).await });
        LinkRun { links: rx, handle }
    }

    async fn drive(self, links: mpsc::Sender<Link>, cancel: CancellationToken) -> RunSummary {
        let mut summary = RunSummary::default();
        let scanner = self.options.scanner();
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for source in &self.options.sources {
            if cancel.is_cancelled() {
                break;
            }
            let mut discovery = match scanner.discover(source, cancel.clone()) {
                Ok(discovery) => discovery,
                Err(_) => {
                    summary.failed_roots += 1;
                    continue;
                }
            };

            while let Some(entity) = discovery.next().await {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                let options = self.options.clone();
                let resolver = self.resolver.clone();
                let links = links.clone();
                tasks.spawn(async move {
                    let _permit = permit;
                    process_entity(entity, &options, resolver.as_ref(), &links).await
                });
            }

            match discovery.finish().await {
                Ok(stats) => summary.scan += stats,
                Err(e) => warn!(source = %source.display(), error = %e, "Discovery failed"),
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let resolved = match joined {
                Ok(EntityOutcome::KindExcluded) => {
                    summary.kind_excluded += 1;
                    None
                }
                Ok(EntityOutcome::Untitled) => {
                    summary.untitled += 1;
                    None
                }
                Ok(EntityOutcome::Filtered { resolved }) => {
                    summary.filtered += 1;
                    resolved
                }
                Ok(EntityOutcome::Planned { resolved }) => {
                    summary.planned += 1;
                    resolved
                }
                Err(e) => {
                    warn!(error = %e, "Entity task failed");
                    None
                }
            };
            match resolved {
                Some(true) => summary.resolved += 1,
                Some(false) => summary.unresolved += 1,
                None => {}
            }
        }

        info!(%summary, "Link run finished");
        summary
    }
}

async fn process_entity(
    mut entity: MediaEntity,
    options: &LinkOptions,
    resolver: Option<&Resolver>,
    links: &mpsc::Sender<Link>,
) -> EntityOutcome {
    if options.exclude_kinds.contains(&entity.kind()) {
        debug!(path = %entity.source_path().display(), kind = %entity.kind(), "Excluded by kind");
        return EntityOutcome::KindExcluded;
    }
    // Without a series name the library path has no series directory.
    if let MediaEntity::Episode(episode) = &entity {
        if episode.series.trim().is_empty() {
            debug!(path = %entity.source_path().display(), "Episode has no series name");
            return EntityOutcome::Untitled;
        }
    }

    let resolved = match resolver {
        Some(resolver) => Some(resolver.enrich(&mut entity).await),
        None => None,
    };

    if let Some(filter) = options.media_filters.iter().find(|f| f.excludes(&entity)) {
        debug!(path = %entity.source_path().display(), ?filter, "Filtered");
        return EntityOutcome::Filtered { resolved };
    }

    let link = Link::plan(&entity, &options.destination);
    // The caller may stop listening early.
    let _ = links.send(link).await;
    EntityOutcome::Planned { resolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::CountryFilter;
    use tempfile::TempDir;

    fn touch(root: &std::path::Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[tokio::test]
    async fn test_run_without_resolver() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "Foobar.1999.2160p.WEB-DL.mkv");
        touch(src.path(), "clobberin.time.s01e01.lets.go.mkv");
        touch(src.path(), "Foobar.1999.sample.mkv");

        let options = LinkOptions::new("/lib", vec![src.path().to_path_buf()]);
        let (links, summary) = Orchestrator::new(options, None)
            .run(CancellationToken::new())
            .collect()
            .await
            .unwrap();

        let mut targets: Vec<PathBuf> = links.into_iter().map(|l| l.target).collect();
        targets.sort();
        assert_eq!(
            targets,
            vec![
                PathBuf::from("/lib/movies/Foobar (1999)/Foobar.1999.2160p.WEB-DL.mkv"),
                PathBuf::from("/lib/tv/Clobberin Time/Season 1/Clobberin Time - S01E01 - Lets Go.mkv"),
            ]
        );
        assert_eq!(summary.scan.excluded, 1);
        assert_eq!(summary.planned, 2);
        assert_eq!(summary.resolved + summary.unresolved, 0);
    }

    #[tokio::test]
    async fn test_kind_exclusion_and_missing_root() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "Foobar.1999.mkv");
        touch(src.path(), "show.s01e02.mkv");

        let options = LinkOptions::new(
            "/lib",
            vec![src.path().join("missing"), src.path().to_path_buf()],
        )
        .exclude_kind(MediaKind::Episode)
        .with_media_filter(CountryFilter::new(["us"]));

        let (links, summary) = Orchestrator::new(options, None)
            .run(CancellationToken::new())
            .collect()
            .await
            .unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(summary.failed_roots, 1);
        assert_eq!(summary.kind_excluded, 1);
        assert_eq!(summary.filtered, 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            planned: 2,
            failed_roots: 1,
            ..Default::default()
        };
        let line = summary.to_string();
        assert!(line.contains("2 links planned"));
        assert!(line.ends_with("1 roots unreadable"));
    }
}
