use super::{
    FunctionChoice, FunctionChoiceBehavior, FunctionChoiceConfiguration, FunctionChoiceContext,
    resolve_functions,
};
use crate::error::KernelError;

/// Describes functions to the model without letting it call them.
///
/// Useful when the model should know the available functions, for example to plan,
/// but no function may run.
#[derive(Debug, Clone, Default)]
pub struct NoneFunctionChoiceBehavior {
    functions: Vec<String>,
}

impl NoneFunctionChoiceBehavior {
    /// Advertises every registered function.
    pub fn new() -> Self {
        Self::default()
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

impl FunctionChoiceBehavior for NoneFunctionChoiceBehavior {
    fn configure(
        &self,
        context: FunctionChoiceContext<'_>,
    ) -> Result<FunctionChoiceConfiguration, KernelError> {
        let functions = resolve_functions(&self.functions, context.kernel, false)?;
        Ok(FunctionChoiceConfiguration {
            choice: FunctionChoice::None,
            auto_invoke: false,
            functions,
        })
    }
}
