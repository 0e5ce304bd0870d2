use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::oracle::QueryCorrector;
use crate::error::{PriceEngineError, Result};

/// Fixed query -> title table. Unknown queries fail like an empty completion.
#[derive(Debug, Default)]
pub struct MemoryCorrector {
    corrections: HashMap<String, String>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl MemoryCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails, as during an upstream outage
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_correction(mut self, query: &str, corrected: &str) -> Self {
        self.corrections
            .insert(query.trim().to_lowercase(), corrected.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryCorrector for MemoryCorrector {
    async fn correct(&self, query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(PriceEngineError::Oracle("HTTP 503 Service Unavailable".to_string()));
        }

        self.corrections
            .get(&query.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| PriceEngineError::Oracle("empty completion".to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
