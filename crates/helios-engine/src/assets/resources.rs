//! Texture request tracking.
//!
//! The engine never decodes images. It hands out a [`TextureId`] per path,
//! queues the path for the host, and waits for the host to report each load
//! as finished or failed. Bodies build their meshes once every texture they
//! need has settled.

use std::collections::HashMap;
use std::rc::Rc;

use crate::api::types::{TextureId, WorldEvent};
use crate::core::events::EventBus;

/// Load state of a requested texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed,
}

impl LoadStatus {
    pub fn is_settled(self) -> bool {
        self != LoadStatus::Pending
    }
}

#[derive(Debug)]
struct Entry {
    path: String,
    status: LoadStatus,
}

/// Synchronous loader used by native hosts and tests.
pub trait TextureLoader {
    /// Load the image at `path`. An `Err` carries a human-readable reason.
    fn load(&mut self, path: &str) -> Result<(), String>;
}

pub struct Resources {
    entries: Vec<Entry>,
    index: HashMap<String, TextureId>,
    requests: Vec<TextureId>,
    ready_sent: bool,
    bus: Rc<EventBus>,
}

impl Resources {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            requests: Vec::new(),
            ready_sent: false,
            bus,
        }
    }

    /// Request a texture. Repeated requests for the same path share one slot.
    pub fn request(&mut self, path: &str) -> TextureId {
        if let Some(&id) = self.index.get(path) {
            return id;
        }
        let id = TextureId(self.entries.len() as u32);
        self.entries.push(Entry {
            path: path.to_string(),
            status: LoadStatus::Pending,
        });
        self.index.insert(path.to_string(), id);
        self.requests.push(id);
        // A new request reopens loading.
        self.ready_sent = false;
        id
    }

    /// Take the requests the host has not seen yet, as `(id, path)` pairs.
    pub fn drain_requests(&mut self) -> Vec<(TextureId, String)> {
        std::mem::take(&mut self.requests)
            .into_iter()
            .map(|id| (id, self.entries[id.0 as usize].path.clone()))
            .collect()
    }

    /// Record the host's result for `path`. Unknown or already settled paths are ignored.
    pub fn resolve(&mut self, path: &str, result: Result<(), String>) {
        let Some(&id) = self.index.get(path) else {
            log::warn!("Resolved texture that was never requested: {path}");
            return;
        };
        let entry = &mut self.entries[id.0 as usize];
        if entry.status.is_settled() {
            return;
        }
        entry.status = match result {
            Ok(()) => {
                log::debug!("Loaded texture {path}");
                LoadStatus::Loaded
            }
            Err(reason) => {
                log::error!("Load texture error: {path}: {reason}");
                LoadStatus::Failed
            }
        };

        self.bus.emit(WorldEvent::LoadingProgress(self.progress()));
        if !self.ready_sent && self.is_ready() {
            self.ready_sent = true;
            log::info!("All {} textures settled", self.entries.len());
            self.bus.emit(WorldEvent::ResourcesReady);
        }
    }

    /// Resolve every outstanding request through `loader`.
    pub fn pump(&mut self, loader: &mut impl TextureLoader) {
        for (_, path) in self.drain_requests() {
            let result = loader.load(&path);
            self.resolve(&path, result);
        }
    }

    pub fn status(&self, path: &str) -> Option<LoadStatus> {
        self.index
            .get(path)
            .map(|id| self.entries[id.0 as usize].status)
    }

    /// Texture for `path` if it loaded. Failed and pending textures yield `None`.
    pub fn texture(&self, path: &str) -> Option<TextureId> {
        let id = *self.index.get(path)?;
        (self.entries[id.0 as usize].status == LoadStatus::Loaded).then_some(id)
    }

    /// Order-preserving lookup of several paths, once all of them have settled.
    /// Returns `None` while any is still pending.
    pub fn settled(&self, paths: &[String]) -> Option<Vec<Option<TextureId>>> {
        let all_settled = paths
            .iter()
            .all(|p| self.status(p).is_some_and(LoadStatus::is_settled));
        all_settled.then(|| paths.iter().map(|p| self.texture(p)).collect())
    }

    /// Fraction of requests that have settled. An empty set counts as complete.
    pub fn progress(&self) -> f32 {
        if self.entries.is_empty() {
            return 1.0;
        }
        let done = self.entries.iter().filter(|e| e.status.is_settled()).count();
        done as f32 / self.entries.len() as f32
    }

    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_settled())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
