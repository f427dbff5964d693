// ABOUTME: Shared template cache keyed by exact template text
// ABOUTME: Capacity-bounded with least-recently-used eviction and transparent recompilation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::template::{compile, CompiledTemplate, Result};

const DEFAULT_CAPACITY: usize = 64;

struct CacheEntry {
    template: Arc<CompiledTemplate>,
    last_used: u64,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

/// Maps template text to its compiled artifact.
///
/// Lookup-or-insert is atomic with respect to the map, but compilation runs
/// outside the lock: two concurrent first requests for the same text may both
/// compile (a benign race), and the second insert simply replaces the first.
/// At capacity the least recently used entry is evicted; an evicted template
/// is recompiled on next access.
pub struct TemplateCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                clock: 0,
            }),
        }
    }

    /// Look up a compiled template by its text, compiling on a miss
    pub fn get_or_compile(&self, text: &str) -> Result<Arc<CompiledTemplate>> {
        {
            let mut inner = self.inner.lock().expect("template cache lock poisoned");
            inner.clock += 1;
            let tick = inner.clock;
            if let Some(entry) = inner.entries.get_mut(text) {
                entry.last_used = tick;
                return Ok(entry.template.clone());
            }
        }

        // Compile without holding the lock; a concurrent caller may compile
        // the same text, and whichever insert lands last wins
        let template = Arc::new(compile(text)?);

        let mut inner = self.inner.lock().expect("template cache lock poisoned");
        inner.clock += 1;
        let tick = inner.clock;
        inner.entries.insert(
            text.to_string(),
            CacheEntry {
                template: template.clone(),
                last_used: tick,
            },
        );
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        Ok(template)
    }

    /// Whether a template text currently has a cached entry
    pub fn contains(&self, text: &str) -> bool {
        self.inner
            .lock()
            .expect("template cache lock poisoned")
            .entries
            .contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("template cache lock poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
