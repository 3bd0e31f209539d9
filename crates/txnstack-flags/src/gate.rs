//! The feature gate: a locally cached flag value refreshed in the background

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use txnstack_config::FeaturesConfig;

use crate::provider::{FlagRegistration, HttpFlagProvider, ProviderRef};

/// Namespace the API flags are registered under
pub const FLAG_NAMESPACE: &str = "api";
/// Advanced filtering flag, relative to [`FLAG_NAMESPACE`]
pub const ADVANCED_FILTERS: &str = "advancedFilters";

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot of every flag the service knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagValues {
    /// Date, category and amount filters are honored
    pub advanced_filters: bool,
}

impl FlagValues {
    /// Registration payload carrying the static defaults
    pub fn registration() -> FlagRegistration {
        let defaults = FlagValues::default();
        FlagRegistration {
            namespace: FLAG_NAMESPACE.to_string(),
            flags: BTreeMap::from([(ADVANCED_FILTERS.to_string(), defaults.advanced_filters)]),
        }
    }

    /// Merge fetched values; flags missing from `fetched` fall back to defaults.
    /// Returns true when anything changed.
    pub fn apply(&mut self, fetched: &HashMap<String, bool>) -> bool {
        let key = format!("{}.{}", FLAG_NAMESPACE, ADVANCED_FILTERS);
        let next = FlagValues {
            advanced_filters: fetched
                .get(&key)
                .copied()
                .unwrap_or(FlagValues::default().advanced_filters),
        };
        let changed = *self != next;
        *self = next;
        changed
    }
}

struct RefreshHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Whether advanced filtering is on, safe to read from any request.
///
/// Reads never touch the network. With a provider attached, a single
/// background task overwrites the cached values on every refresh.
pub struct FeatureGate {
    values: Arc<RwLock<FlagValues>>,
    provider: Option<ProviderRef>,
    refresh: Mutex<Option<RefreshHandle>>,
}

impl FeatureGate {
    /// Gate with default values and no provider
    pub fn disabled() -> Self {
        Self::fixed(FlagValues::default().advanced_filters)
    }

    /// Gate pinned to a value, no provider
    pub fn fixed(advanced_filters: bool) -> Self {
        Self {
            values: Arc::new(RwLock::new(FlagValues { advanced_filters })),
            provider: None,
            refresh: Mutex::new(None),
        }
    }

    /// Build the gate described by the feature configuration.
    ///
    /// Provider problems never fail startup; the gate just keeps its defaults.
    pub async fn from_config(config: &FeaturesConfig) -> Self {
        let gate = if let Some(enabled) = config.advanced_filters_override {
            log::info!("Advanced filtering pinned to {} by configuration", enabled);
            Self::fixed(enabled)
        } else if config.is_local() {
            log::warn!("Feature flag API key not provided, using default flag values");
            Self::disabled()
        } else {
            match HttpFlagProvider::new(&config.provider_url, &config.api_key, PROVIDER_TIMEOUT) {
                Ok(provider) => {
                    let interval = Duration::from_secs(config.refresh_interval_secs);
                    Self::with_provider(Arc::new(provider), interval).await
                }
                Err(e) => {
                    log::warn!("Feature flags disabled: {}", e);
                    Self::disabled()
                }
            }
        };

        log::info!(
            "Feature flags initialized: advancedFilters={}",
            gate.is_advanced_filtering_enabled()
        );
        gate
    }

    /// Run the provider handshake, then start the background refresh.
    ///
    /// Must be called inside a tokio runtime. A failed handshake is logged and
    /// the refresh still starts, so the gate recovers once the provider does.
    pub async fn with_provider(provider: ProviderRef, interval: Duration) -> Self {
        match provider.setup(&FlagValues::registration()).await {
            Ok(()) => log::info!("Feature flag provider initialized successfully"),
            Err(e) => log::warn!("Feature flag provider setup failed, using defaults: {}", e),
        }

        let values = Arc::new(RwLock::new(FlagValues::default()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(refresh_loop(
            provider.clone(),
            values.clone(),
            interval,
            shutdown_rx,
        ));

        Self {
            values,
            provider: Some(provider),
            refresh: Mutex::new(Some(RefreshHandle { shutdown_tx, task })),
        }
    }

    /// Current flag snapshot
    pub fn values(&self) -> FlagValues {
        *self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_advanced_filtering_enabled(&self) -> bool {
        self.values().advanced_filters
    }

    /// Whether a background refresh task is still attached
    pub fn is_refreshing(&self) -> bool {
        self.refresh
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Stop the refresh task and release the provider.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub async fn shutdown(&self) {
        let handle = self
            .refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(handle) = handle else {
            return;
        };

        let _ = handle.shutdown_tx.send(());
        if let Err(e) = handle.task.await {
            log::warn!("Feature flag refresh task ended abnormally: {}", e);
        }

        if let Some(provider) = &self.provider {
            provider.shutdown().await;
        }
        log::info!("Feature flag provider shutdown complete");
    }
}

impl std::fmt::Debug for FeatureGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureGate")
            .field("values", &self.values())
            .field("remote", &self.provider.is_some())
            .finish()
    }
}

async fn refresh_loop(
    provider: ProviderRef,
    values: Arc<RwLock<FlagValues>>,
    interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // A dropped sender also ends the loop.
        tokio::select! {
            _ = &mut shutdown_rx => break,
            _ = async {
                ticker.tick().await;
                refresh_once(&provider, &values).await;
            } => {}
        }
    }

    log::debug!("Feature flag refresh loop stopped");
}

/// A failed fetch keeps the last known values rather than resetting them.
async fn refresh_once(provider: &ProviderRef, values: &RwLock<FlagValues>) {
    match provider.fetch().await {
        Ok(fetched) => {
            let mut guard = values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            if guard.apply(&fetched) {
                log::info!("Feature flags updated: advancedFilters={}", guard.advanced_filters);
            }
        }
        Err(e) => log::warn!("Feature flag refresh failed, keeping current values: {}", e),
    }
}
