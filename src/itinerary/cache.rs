use std::collections::HashMap;
use std::sync::Mutex;

use super::TripRequest;

/// Process-wide memo of successful itineraries, keyed by the exact
/// request. Insert-if-absent, no eviction.
#[derive(Default)]
pub struct ItineraryCache {
    entries: Mutex<HashMap<TripRequest, String>>,
}

impl ItineraryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &TripRequest) -> Option<String> {
        self.entries.lock().ok()?.get(request).cloned()
    }

    /// Keep the first text stored for `request`; returns what is cached.
    pub fn insert(&self, request: &TripRequest, text: &str) -> String {
        match self.entries.lock() {
            Ok(mut entries) => entries
                .entry(request.clone())
                .or_insert_with(|| text.to_string())
                .clone(),
            // A poisoned memo only costs a cache miss.
            Err(_) => text.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
