use crate::Map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminates the capability a service provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    /// Produces chat messages.
    ChatCompletion,
    /// Produces plain text.
    TextGeneration,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::ChatCompletion => f.write_str("chat-completion"),
            ServiceType::TextGeneration => f.write_str("text-generation"),
        }
    }
}

/// A configured backend, such as a specific vendor, model and endpoint combination.
pub trait AiService: Send + Sync {
    /// Unique key of the service within a kernel.
    fn service_id(&self) -> &str;

    /// The capability this service provides.
    fn service_type(&self) -> ServiceType {
        ServiceType::ChatCompletion
    }

    /// The model this service talks to, if fixed.
    fn model_id(&self) -> Option<&str> {
        None
    }

    /// Open-ended attributes such as the endpoint.
    fn attributes(&self) -> &Map;
}
