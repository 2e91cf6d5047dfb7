//! Proxy pool with least-recently-used selection and failure tracking.

use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_protocol() -> String {
    "http".to_string()
}

/// One outbound proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxyEndpoint {
    /// Value for Chromium's `--proxy-server`, without credentials
    pub fn server(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProxyFile {
    List(Vec<ProxyEndpoint>),
    Wrapped { proxies: Vec<ProxyEndpoint> },
}

#[derive(Debug)]
struct ProxySlot {
    endpoint: ProxyEndpoint,
    failures: u32,
    success_count: u32,
    last_used: Option<u64>,
}

/// Rotating pool of proxies
#[derive(Debug)]
pub struct ProxyPool {
    slots: Vec<ProxySlot>,
    max_failures: u32,
    use_counter: u64,
}

impl ProxyPool {
    pub fn new(endpoints: Vec<ProxyEndpoint>, max_failures: u32) -> Self {
        let slots = endpoints
            .into_iter()
            .map(|endpoint| ProxySlot {
                endpoint,
                failures: 0,
                success_count: 0,
                last_used: None,
            })
            .collect();

        Self {
            slots,
            max_failures: max_failures.max(1),
            use_counter: 0,
        }
    }

    /// Load a JSON proxy list, either a bare array or `{"proxies": [...]}`
    pub fn load(path: &Path, max_failures: u32) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let endpoints = match serde_json::from_str::<ProxyFile>(&contents)? {
            ProxyFile::List(list) | ProxyFile::Wrapped { proxies: list } => list,
        };

        if let Some(bad) = endpoints.iter().find(|p| p.host.trim().is_empty()) {
            return Err(BrowserError::ProxyConfig(format!(
                "proxy with empty host on port {}",
                bad.port
            )));
        }

        tracing::info!(
            "Loaded {} proxies from {}",
            endpoints.len(),
            path.display()
        );
        Ok(Self::new(endpoints, max_failures))
    }

    /// Pick the least recently used healthy proxy
    pub fn next(&mut self) -> Option<ProxyEndpoint> {
        let max_failures = self.max_failures;
        let slot = self
            .slots
            .iter_mut()
            .filter(|slot| slot.failures < max_failures)
            .min_by_key(|slot| slot.last_used.map_or(0, |seq| seq + 1))?;

        self.use_counter += 1;
        slot.last_used = Some(self.use_counter);
        Some(slot.endpoint.clone())
    }

    pub fn mark_failure(&mut self, endpoint: &ProxyEndpoint) {
        let max_failures = self.max_failures;
        if let Some(slot) = self.slot_mut(endpoint) {
            slot.failures += 1;
            if slot.failures >= max_failures {
                tracing::warn!("Retiring proxy {} after {} failures", endpoint.server(), slot.failures);
            }
        }
    }

    pub fn mark_success(&mut self, endpoint: &ProxyEndpoint) {
        if let Some(slot) = self.slot_mut(endpoint) {
            slot.success_count += 1;
            slot.failures = slot.failures.saturating_sub(1);
        }
    }

    pub fn healthy_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.failures < self.max_failures)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_mut(&mut self, endpoint: &ProxyEndpoint) -> Option<&mut ProxySlot> {
        self.slots.iter_mut().find(|slot| &slot.endpoint == endpoint)
    }
}
