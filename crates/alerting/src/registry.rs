//! Per-Organization Backend Registry

use crate::backend::Alertmanager;
use crate::error::AlertmanagerError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Registry of the backend serving each organization
#[derive(Default)]
pub struct OrgRegistry {
    backends: RwLock<HashMap<i64, Arc<dyn Alertmanager>>>,
}

impl OrgRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own org ID, returning the one it replaces
    pub fn register(&self, backend: Arc<dyn Alertmanager>) -> Option<Arc<dyn Alertmanager>> {
        let org_id = backend.org_id();
        let previous = self
            .backends
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(org_id, backend);

        if previous.is_some() {
            warn!("Replaced Alertmanager backend for org {}", org_id);
        } else {
            info!("Registered Alertmanager backend for org {}", org_id);
        }
        previous
    }

    /// Backend serving `org_id`
    pub fn get(&self, org_id: i64) -> Result<Arc<dyn Alertmanager>, AlertmanagerError> {
        self.backends
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&org_id)
            .cloned()
            .ok_or(AlertmanagerError::OrgNotFound(org_id))
    }

    pub fn remove(&self, org_id: i64) -> Option<Arc<dyn Alertmanager>> {
        self.backends
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&org_id)
    }

    /// Registered org IDs in ascending order
    pub fn org_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .backends
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.backends
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop every registered backend
    pub async fn stop_all(&self) {
        let backends: Vec<Arc<dyn Alertmanager>> = self
            .backends
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();

        for backend in backends {
            backend.stop_and_wait().await;
        }
        info!("Stopped all Alertmanager backends");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertFilter, AlertGroup, GettableAlert, PostableAlert};
    use crate::config::{AlertConfiguration, UserConfig};
    use crate::receiver::{
        Receiver, TestReceiversRequest, TestReceiversResult, TestTemplatesRequest,
        TestTemplatesResults,
    };
    use crate::silence::{GettableSilence, PostableSilence};
    use crate::status::GettableStatus;
    use crate::backend::Capability;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        org_id: i64,
        stops: AtomicUsize,
    }

    impl StubBackend {
        fn new(org_id: i64) -> Arc<Self> {
            Arc::new(Self {
                org_id,
                stops: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Alertmanager for StubBackend {
        async fn save_and_apply_config(&self, _: &UserConfig) -> Result<(), AlertmanagerError> {
            Ok(())
        }
        async fn save_and_apply_default_config(&self) -> Result<(), AlertmanagerError> {
            Ok(())
        }
        async fn get_status(&self) -> Result<GettableStatus, AlertmanagerError> {
            Err(AlertmanagerError::Decode("stub".to_string()))
        }
        async fn create_silence(&self, _: &PostableSilence) -> Result<String, AlertmanagerError> {
            Ok("id".to_string())
        }
        async fn delete_silence(&self, _: &str) -> Result<(), AlertmanagerError> {
            Ok(())
        }
        async fn get_silence(&self, id: &str) -> Result<GettableSilence, AlertmanagerError> {
            Err(AlertmanagerError::SilenceNotFound(id.to_string()))
        }
        async fn list_silences(&self, _: &[String]) -> Result<Vec<GettableSilence>, AlertmanagerError> {
            Ok(Vec::new())
        }
        async fn get_alerts(&self, _: &AlertFilter) -> Result<Vec<GettableAlert>, AlertmanagerError> {
            Ok(Vec::new())
        }
        async fn get_alert_groups(&self, _: &AlertFilter) -> Result<Vec<AlertGroup>, AlertmanagerError> {
            Ok(Vec::new())
        }
        async fn put_alerts(&self, _: &[PostableAlert]) -> Result<(), AlertmanagerError> {
            Ok(())
        }
        async fn get_receivers(&self) -> Result<Vec<Receiver>, AlertmanagerError> {
            Ok(Vec::new())
        }
        async fn test_receivers(
            &self,
            _: &TestReceiversRequest,
        ) -> Result<TestReceiversResult, AlertmanagerError> {
            Err(AlertmanagerError::NotImplemented(Capability::TestReceivers))
        }
        async fn test_template(
            &self,
            _: &TestTemplatesRequest,
        ) -> Result<TestTemplatesResults, AlertmanagerError> {
            Ok(TestTemplatesResults::default())
        }
        async fn apply_config(&self, _: &AlertConfiguration) -> Result<(), AlertmanagerError> {
            Ok(())
        }
        async fn stop_and_wait(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
        fn ready(&self) -> bool {
            true
        }
        fn org_id(&self) -> i64 {
            self.org_id
        }
        fn config_hash(&self) -> [u8; 16] {
            [0; 16]
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = OrgRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register(StubBackend::new(3)).is_none());
        assert!(registry.register(StubBackend::new(1)).is_none());

        assert_eq!(registry.get(3).unwrap().org_id(), 3);
        assert_eq!(registry.org_ids(), vec![1, 3]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_org() {
        let registry = OrgRegistry::new();
        let err = registry.get(42).err().unwrap();
        assert!(matches!(err, AlertmanagerError::OrgNotFound(42)));
    }

    #[test]
    fn test_register_replaces_existing() {
        let registry = OrgRegistry::new();
        registry.register(StubBackend::new(7));
        let previous = registry.register(StubBackend::new(7));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(7).is_some());
        assert!(registry.get(7).is_err());
    }

    #[test]
    fn test_poisoned_lock_still_readable() {
        let registry = Arc::new(OrgRegistry::new());
        registry.register(StubBackend::new(1));
        registry.register(StubBackend::new(2));

        let writer = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.backends.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(registry.backends.is_poisoned());

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.org_ids(), vec![1, 2]);
    }

    #[test]
    fn test_default_capabilities_supported() {
        let backend = StubBackend::new(1);
        assert!(Capability::ALL.iter().all(|c| backend.supports(*c)));
    }

    #[tokio::test]
    async fn test_stop_all() {
        let registry = OrgRegistry::new();
        let first = StubBackend::new(1);
        let second = StubBackend::new(2);
        registry.register(first.clone());
        registry.register(second.clone());

        registry.stop_all().await;

        assert_eq!(first.stops.load(Ordering::SeqCst), 1);
        assert_eq!(second.stops.load(Ordering::SeqCst), 1);
    }
}
