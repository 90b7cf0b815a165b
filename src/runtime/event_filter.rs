//! # Event Filter
//!
//! Drops watch events that would only trigger a no-op reconcile.
//!
//! An object is admitted when it is seen for the first time, when its uid
//! changed (recreated under the same name), when its `metadata.generation`
//! changed, or when its deletion timestamp was newly set. Status-only and
//! metadata-only updates leave the generation untouched and are dropped.
//! Confirmed deletions are dropped and their key forgotten. Keys missing from a
//! relist are forgotten when the relist completes.

use crate::controller::reconciler::ObjectKey;
use crate::crd::GlueJob;
use kube_runtime::watcher;
use std::collections::{HashMap, HashSet};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Observed {
    uid: Option<String>,
    generation: Option<i64>,
    deleting: bool,
}

impl Observed {
    fn of(job: &GlueJob) -> Self {
        Self {
            uid: job.metadata.uid.clone(),
            generation: job.metadata.generation,
            deleting: job.metadata.deletion_timestamp.is_some(),
        }
    }
}

/// Last admitted generation per object
#[derive(Debug, Default)]
pub struct GenerationFilter {
    seen: HashMap<ObjectKey, Observed>,
    /// Keys listed since the last `Init`, while a relist is in progress
    relisted: Option<HashSet<ObjectKey>>,
}

impl GenerationFilter {
    /// Record `job` and decide whether it needs a reconcile
    pub fn admit(&mut self, job: &GlueJob) -> bool {
        let key = ObjectKey::for_job(job);
        if let Some(relisted) = self.relisted.as_mut() {
            relisted.insert(key.clone());
        }
        let current = Observed::of(job);
        match self.seen.insert(key, current.clone()) {
            None => true,
            Some(previous) => {
                previous.uid != current.uid
                    || previous.generation != current.generation
                    || (current.deleting && !previous.deleting)
            }
        }
    }

    pub fn forget(&mut self, job: &GlueJob) {
        self.seen.remove(&ObjectKey::for_job(job));
    }

    /// Map a raw watcher event to a reconcile trigger, `None` to drop it
    pub fn filter_event(
        &mut self,
        event: Result<watcher::Event<GlueJob>, watcher::Error>,
    ) -> Option<Result<GlueJob, watcher::Error>> {
        match event {
            Ok(watcher::Event::Apply(job) | watcher::Event::InitApply(job)) => {
                if self.admit(&job) {
                    Some(Ok(job))
                } else {
                    trace!(
                        resource.name = job.metadata.name.as_deref().unwrap_or("unknown"),
                        "Generation unchanged, skipping event"
                    );
                    None
                }
            }
            Ok(watcher::Event::Delete(job)) => {
                self.forget(&job);
                None
            }
            Ok(watcher::Event::Init) => {
                self.relisted = Some(HashSet::new());
                None
            }
            Ok(watcher::Event::InitDone) => {
                if let Some(relisted) = self.relisted.take() {
                    self.seen.retain(|key, _| relisted.contains(key));
                }
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}
