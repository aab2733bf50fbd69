use super::{
    FunctionChoice, FunctionChoiceBehavior, FunctionChoiceConfiguration, FunctionChoiceContext,
    resolve_functions,
};
use crate::error::KernelError;

/// Lets the model decide whether to call the advertised functions, and by default
/// invokes the calls it makes.
#[derive(Debug, Clone)]
pub struct AutoFunctionChoiceBehavior {
    auto_invoke: bool,
    functions: Vec<String>,
}

impl Default for AutoFunctionChoiceBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoFunctionChoiceBehavior {
    /// Advertises every registered function and auto-invokes the calls.
    pub fn new() -> Self {
        Self {
            auto_invoke: true,
            functions: Vec::new(),
        }
    }

    /// Sets whether the calls are invoked automatically.
    pub fn with_auto_invoke(mut self, auto_invoke: bool) -> Self {
        self.auto_invoke = auto_invoke;
        self
    }

    /// Restricts the advertised functions to the fully-qualified names.
    pub fn with_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions = functions.into_iter().map(Into::into).collect();
        self
    }
}

impl FunctionChoiceBehavior for AutoFunctionChoiceBehavior {
    fn configure(
        &self,
        context: FunctionChoiceContext<'_>,
    ) -> Result<FunctionChoiceConfiguration, KernelError> {
        let functions = resolve_functions(&self.functions, context.kernel, self.auto_invoke)?;
        Ok(FunctionChoiceConfiguration {
            choice: FunctionChoice::Auto,
            auto_invoke: self.auto_invoke,
            functions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contents::ChatHistory;
    use crate::function_choice::tests::kernel;

    #[test]
    fn test_auto_configuration() {
        let kernel = kernel();
        let history = ChatHistory::new();
        let context = FunctionChoiceContext {
            request_index: 1,
            chat_history: &history,
            kernel: Some(&kernel),
        };

        let config = AutoFunctionChoiceBehavior::new().configure(context).unwrap();
        assert_eq!(config.choice, FunctionChoice::Auto);
        assert!(config.auto_invoke);
        assert_eq!(config.functions.len(), 3);

        let config = AutoFunctionChoiceBehavior::new()
            .with_auto_invoke(false)
            .with_functions(["clock.now", "clock.missing"])
            .configure(context)
            .unwrap();
        assert!(!config.auto_invoke);
        assert_eq!(config.functions.len(), 1);

        let err = AutoFunctionChoiceBehavior::new()
            .with_functions(["clock.missing"])
            .configure(context)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "the specified function clock.missing is not available in the kernel"
        );
    }

    #[test]
    fn test_auto_without_kernel() {
        let history = ChatHistory::new();
        let context = FunctionChoiceContext {
            request_index: 1,
            chat_history: &history,
            kernel: None,
        };
        for behavior in [
            AutoFunctionChoiceBehavior::new(),
            AutoFunctionChoiceBehavior::new().with_functions(["clock.now"]),
        ] {
            let result = behavior.configure(context);
            assert!(matches!(result, Err(KernelError::KernelRequired)));
        }

        let config = AutoFunctionChoiceBehavior::new()
            .with_auto_invoke(false)
            .with_functions(["clock.now"])
            .configure(context)
            .unwrap();
        assert!(!config.auto_invoke);
        assert!(config.functions.is_empty());
    }
}
