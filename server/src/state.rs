use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use riesgo_shared::ClientConfig;

use crate::config;

#[derive(Clone)]
pub struct AppState {
    /// Read-only directory holding tile archives and the downloadable datasets.
    pub data_dir: Arc<PathBuf>,
    pub client_dist_dir: Arc<PathBuf>,
    pub client_config: Arc<ClientConfig>,
    pub started_at: DateTime<Utc>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    downloads_served_total: AtomicU64,
    download_bytes_total: AtomicU64,
    downloads_rejected_total: AtomicU64,
    download_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub downloads_served_total: u64,
    pub download_bytes_total: u64,
    pub downloads_rejected_total: u64,
    pub download_failures_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            downloads_served_total: self.downloads_served_total.load(Ordering::Relaxed),
            download_bytes_total: self.download_bytes_total.load(Ordering::Relaxed),
            downloads_rejected_total: self.downloads_rejected_total.load(Ordering::Relaxed),
            download_failures_total: self.download_failures_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_download_served(&self, bytes: u64) {
        self.downloads_served_total.fetch_add(1, Ordering::Relaxed);
        self.download_bytes_total
            .fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_download_rejected(&self) {
        self.downloads_rejected_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_download_failure(&self) {
        self.download_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(data_dir: PathBuf, client_dist_dir: PathBuf, client_config: ClientConfig) -> Self {
        Self {
            data_dir: Arc::new(data_dir),
            client_dist_dir: Arc::new(client_dist_dir),
            client_config: Arc::new(client_config),
            started_at: Utc::now(),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    pub fn from_env() -> Self {
        let client_config = ClientConfig {
            geocoder_api_key: config::geocoder_api_key(),
            ..ClientConfig::default()
        };
        Self::new(
            config::data_dir(),
            config::client_dist_dir(),
            client_config,
        )
    }
}
