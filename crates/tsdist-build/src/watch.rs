//! Rebuild one target whenever its sources change.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::CompilationTarget;
use crate::error::BuildError;
use crate::host::FrontEnd;
use crate::orchestrator::{CompileOrchestrator, TargetOutcome, TargetStatus};

/// Quiet period that groups bursts of file events into one rebuild.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Long-lived builder for one target. Every build creates a fresh program,
/// so transforms are attached anew each time.
pub struct TargetWatcher {
    orchestrator: Arc<CompileOrchestrator>,
    target: CompilationTarget,
    out_dir: PathBuf,
    events: mpsc::UnboundedReceiver<Event>,
    _watcher: RecommendedWatcher,
}

impl TargetWatcher {
    /// Start watching `root` recursively.
    pub fn new(
        root: impl Into<PathBuf>,
        front_end: Arc<dyn FrontEnd>,
        target: CompilationTarget,
    ) -> Result<Self, BuildError> {
        let root = root.into();
        let (sender, events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            match event {
                Ok(event) => {
                    // The receiver is gone once the watcher is dropped.
                    let _ = sender.send(event);
                }
                Err(err) => warn!(error = %err, "file watcher error"),
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        debug!(root = %root.display(), target = %target.name, "watching");

        let out_dir = root.join(&target.output_directory);
        let orchestrator = CompileOrchestrator::new(root, front_end).without_external_api_copy();
        Ok(TargetWatcher {
            orchestrator: Arc::new(orchestrator),
            target,
            out_dir,
            events,
            _watcher: watcher,
        })
    }

    pub fn target(&self) -> &CompilationTarget {
        &self.target
    }

    /// Compile the target once on the blocking pool.
    #[instrument(level = "info", skip_all, fields(target = %self.target.name))]
    pub async fn build(&self) -> TargetOutcome {
        let orchestrator = Arc::clone(&self.orchestrator);
        let target = self.target.clone();
        match tokio::task::spawn_blocking(move || orchestrator.compile(&target)).await {
            Ok(outcome) => outcome,
            Err(err) => TargetOutcome::new(
                &self.target,
                TargetStatus::Failed(BuildError::FrontEnd(anyhow::anyhow!(
                    "watch build did not finish: {err}"
                ))),
            ),
        }
    }

    /// Wait for the next batch of relevant changes. `None` once the
    /// watcher has shut down.
    pub async fn next_change(&mut self) -> Option<Vec<PathBuf>> {
        let mut changed = Vec::new();
        while changed.is_empty() {
            let event = self.events.recv().await?;
            self.collect(event, &mut changed);
        }
        while let Ok(Some(event)) = tokio::time::timeout(DEBOUNCE, self.events.recv()).await {
            self.collect(event, &mut changed);
        }
        changed.sort();
        changed.dedup();
        Some(changed)
    }

    fn collect(&self, event: Event, changed: &mut Vec<PathBuf>) {
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }
        changed.extend(
            event
                .paths
                .into_iter()
                .filter(|path| is_relevant_change(path, &self.out_dir)),
        );
    }

    /// Build, then rebuild after every change, until the watcher shuts down.
    pub async fn run<F>(&mut self, mut on_build: F)
    where
        F: FnMut(&TargetOutcome),
    {
        on_build(&self.build().await);
        while let Some(changed) = self.next_change().await {
            info!(target = %self.target.name, files = changed.len(), "change detected, rebuilding");
            on_build(&self.build().await);
        }
    }
}

/// Source or config changes outside the output directory and dependencies.
pub fn is_relevant_change(path: &Path, out_dir: &Path) -> bool {
    if path.starts_with(out_dir) {
        return false;
    }
    if path
        .components()
        .any(|component| component == Component::Normal(OsStr::new("node_modules")))
    {
        return false;
    }
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("ts" | "tsx" | "json")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevant_changes() {
        let out = Path::new("/p/lib/esm");
        assert!(is_relevant_change(Path::new("/p/src/a.ts"), out));
        assert!(is_relevant_change(Path::new("/p/src/view.tsx"), out));
        assert!(is_relevant_change(Path::new("/p/types/env.d.ts"), out));
        assert!(is_relevant_change(Path::new("/p/tsconfig.esm.json"), out));

        assert!(!is_relevant_change(Path::new("/p/lib/esm/a.d.ts"), out));
        assert!(!is_relevant_change(Path::new("/p/node_modules/x/index.ts"), out));
        assert!(!is_relevant_change(Path::new("/p/src/a.js"), out));
        assert!(!is_relevant_change(Path::new("/p/README"), out));
    }
}
