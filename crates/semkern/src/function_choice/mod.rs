//! Policies deciding which functions are offered to the model and whether the
//! calls it makes are invoked automatically.

use crate::contents::ChatHistory;
use crate::error::KernelError;
use crate::functions::{FunctionName, RegisteredFunction};
use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};
use std::fmt;

mod auto;
mod none;

pub use auto::AutoFunctionChoiceBehavior;
pub use none::NoneFunctionChoiceBehavior;

/// How the model may use the advertised functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionChoice {
    /// The model decides whether to call functions.
    Auto,
    /// Functions are described to the model but must not be called.
    None,
}

impl fmt::Display for FunctionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionChoice::Auto => f.write_str("auto"),
            FunctionChoice::None => f.write_str("none"),
        }
    }
}

/// The resolved decision for one round trip.
#[derive(Debug, Clone)]
pub struct FunctionChoiceConfiguration {
    /// How the model may use the functions.
    pub choice: FunctionChoice,
    /// Whether the calls the model makes are invoked automatically.
    pub auto_invoke: bool,
    /// Functions to advertise, in registration order.
    pub functions: Vec<RegisteredFunction>,
}

impl FunctionChoiceConfiguration {
    /// Returns `true` if the function named by the pair is advertised.
    pub fn is_advertised(&self, function_name: &str, plugin_name: Option<&str>) -> bool {
        self.functions
            .iter()
            .any(|function| function.metadata().matches(function_name, plugin_name))
    }
}

/// The inputs a behavior resolves against.
#[derive(Debug, Clone, Copy)]
pub struct FunctionChoiceContext<'a> {
    /// 1-based index of the round trip.
    pub request_index: usize,
    /// The history sent with the request.
    pub chat_history: &'a ChatHistory,
    /// The kernel whose functions can be advertised, if any.
    pub kernel: Option<&'a Kernel>,
}

/// A strategy resolved once per round trip.
pub trait FunctionChoiceBehavior: Send + Sync + fmt::Debug {
    /// Resolves the configuration for one round trip.
    fn configure(
        &self,
        context: FunctionChoiceContext<'_>,
    ) -> Result<FunctionChoiceConfiguration, KernelError>;
}

/// Resolves fully-qualified names against the kernel.
///
/// With no names every registered function is returned. A name that cannot be resolved is
/// an error when `auto_invoke` is set and skipped otherwise. Auto-invocation without a
/// kernel is an error.
fn resolve_functions(
    function_names: &[String],
    kernel: Option<&Kernel>,
    auto_invoke: bool,
) -> Result<Vec<RegisteredFunction>, KernelError> {
    if auto_invoke && kernel.is_none() {
        return Err(KernelError::KernelRequired);
    }
    if function_names.is_empty() {
        return Ok(kernel.map(|k| k.plugins().functions()).unwrap_or_default());
    }

    let separator = kernel.map_or(crate::functions::function_name::NAME_SEPARATOR, |k| {
        k.config().function_name_separator
    });
    let mut functions = Vec::with_capacity(function_names.len());
    for fqn in function_names {
        let name = FunctionName::parse_with_separator(fqn, separator)?;
        let function = kernel.and_then(|k| {
            k.plugins()
                .get_function(&name.function_name, name.plugin_name.as_deref())
        });
        match function {
            Some(function) => functions.push(function),
            None if auto_invoke => return Err(KernelError::FunctionNotAvailable(fqn.clone())),
            None => tracing::debug!(
                target: "semkern",
                function = %fqn,
                "skipping unavailable function"
            ),
        }
    }
    Ok(functions)
}
