use super::{ChatCompletionService, PromptExecutionSettings, ServiceType};
use crate::error::KernelError;
use parking_lot::RwLock;
use std::sync::Arc;

/// A service chosen for a request, with the settings entry that selected it.
#[derive(Clone)]
pub struct ServiceSelection {
    /// The selected service.
    pub service: Arc<dyn ChatCompletionService>,
    /// `None` when the request carried no settings at all.
    pub settings: Option<PromptExecutionSettings>,
}

impl std::fmt::Debug for ServiceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSelection")
            .field("service_id", &self.service.service_id())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Registry of services. Registration order defines priority.
#[derive(Default)]
pub struct ServiceProvider {
    services: RwLock<Vec<Arc<dyn ChatCompletionService>>>,
}

impl ServiceProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under its id.
    pub fn add_service(&self, service: Arc<dyn ChatCompletionService>) -> Result<(), KernelError> {
        let mut services = self.services.write();
        let service_id = service.service_id();
        if services.iter().any(|s| s.service_id() == service_id) {
            return Err(KernelError::DuplicateService(service_id.to_owned()));
        }
        tracing::debug!(
            target: "semkern",
            service_id,
            service_type = %service.service_type(),
            model_id = service.model_id(),
            "service registered"
        );
        services.push(service);
        Ok(())
    }

    /// Returns the service with the id.
    pub fn get_service(&self, service_id: &str) -> Option<Arc<dyn ChatCompletionService>> {
        self.services
            .read()
            .iter()
            .find(|s| s.service_id() == service_id)
            .cloned()
    }

    /// Selects the service answering a request with the candidate settings.
    ///
    /// Without settings the first service of the type wins. Otherwise a settings entry
    /// naming a registered service id is preferred, then an entry naming the model of a
    /// registered service, and finally the default entry paired with the first service.
    pub fn try_select(
        &self,
        service_type: ServiceType,
        settings: &[PromptExecutionSettings],
    ) -> Option<ServiceSelection> {
        let services = self
            .services
            .read()
            .iter()
            .filter(|s| s.service_type() == service_type)
            .cloned()
            .collect::<Vec<_>>();
        let first = services.first()?;
        if settings.is_empty() {
            return Some(ServiceSelection {
                service: first.clone(),
                settings: None,
            });
        }

        let selection =
            |service: &Arc<dyn ChatCompletionService>, settings: &PromptExecutionSettings| {
                tracing::debug!(
                    target: "semkern",
                    service_id = service.service_id(),
                    settings = settings.target_service_id(),
                    "service selected"
                );
                ServiceSelection {
                    service: service.clone(),
                    settings: Some(settings.clone()),
                }
            };

        let mut default_settings = None;
        for candidate in settings {
            if candidate.is_default() && default_settings.is_none() {
                default_settings = Some(candidate);
            }
            let service_id = candidate.target_service_id();
            if let Some(service) = services.iter().find(|s| s.service_id() == service_id) {
                return Some(selection(service, candidate));
            }
        }

        for candidate in settings {
            let Some(model_id) = candidate.model_id.as_deref() else {
                continue;
            };
            if let Some(service) = services.iter().find(|s| s.model_id() == Some(model_id)) {
                return Some(selection(service, candidate));
            }
        }

        default_settings.map(|candidate| selection(first, candidate))
    }

    /// Returns the ids of all services in registration order.
    pub fn service_ids(&self) -> Vec<String> {
        self.services
            .read()
            .iter()
            .map(|s| s.service_id().to_owned())
            .collect()
    }

    /// Returns the number of services.
    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    /// Returns `true` if no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.service_ids())
            .finish()
    }
}
