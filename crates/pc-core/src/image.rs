//! Image cache contract for `image` elements.
//!
//! Fetching and decoding happen outside the core. The renderer consults the
//! cache by URL; geometry and scoring never wait on it.

use serde::Serialize;
use std::collections::HashMap;

/// Load state of an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Pending,
    Ready,
    Failed,
}

/// URL-keyed cache of decoded images, generic over the host's image handle.
pub trait ImageCache {
    type Handle;

    fn get(&self, url: &str) -> Option<&Self::Handle>;
    fn set(&mut self, url: &str, handle: Self::Handle);
    fn status(&self, url: &str) -> Option<ImageStatus>;
    fn mark(&mut self, url: &str, status: ImageStatus);
}

/// In-memory cache used by headless hosts and tests.
#[derive(Debug)]
pub struct MemoryImageCache<H> {
    entries: HashMap<String, (ImageStatus, Option<H>)>,
}

impl<H> Default for MemoryImageCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> MemoryImageCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> ImageCache for MemoryImageCache<H> {
    type Handle = H;

    fn get(&self, url: &str) -> Option<&H> {
        self.entries.get(url).and_then(|(_, h)| h.as_ref())
    }

    fn set(&mut self, url: &str, handle: H) {
        self.entries
            .insert(url.to_string(), (ImageStatus::Ready, Some(handle)));
    }

    fn status(&self, url: &str) -> Option<ImageStatus> {
        self.entries.get(url).map(|(s, _)| *s)
    }

    fn mark(&mut self, url: &str, status: ImageStatus) {
        let entry = self
            .entries
            .entry(url.to_string())
            .or_insert((status, None));
        entry.0 = status;
        if status != ImageStatus::Ready {
            entry.1 = None;
        }
    }
}
