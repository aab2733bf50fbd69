//! Function invocation filters.

use super::arguments::KernelArguments;
use super::function::{FunctionMetadata, FunctionResult, KernelFunction};
use crate::error::FunctionError;
use crate::kernel::Kernel;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// The state shared by the filters of one function invocation.
pub struct FunctionInvocationContext<'a> {
    /// The kernel running the function.
    pub kernel: &'a Kernel,
    /// Metadata of the function being invoked.
    pub function: &'a FunctionMetadata,
    /// The arguments, which a filter may rewrite before calling `next`.
    pub arguments: KernelArguments,
    /// The result, set once the function has run.
    pub result: FunctionResult,
}

/// Intercepts function invocations.
///
/// A filter runs the rest of the chain by calling [`Next::run`]. Returning without doing
/// so skips the function, leaving whatever is in `context.result`.
#[async_trait::async_trait]
pub trait FunctionInvocationFilter: Send + Sync {
    /// Called for every function invoked through the kernel.
    async fn on_function_invocation(
        &self,
        context: &mut FunctionInvocationContext<'_>,
        next: Next<'_>,
    ) -> Result<(), FunctionError>;
}

/// The remainder of a filter chain.
pub struct Next<'a> {
    filters: &'a [Arc<dyn FunctionInvocationFilter>],
    function: &'a dyn KernelFunction,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        filters: &'a [Arc<dyn FunctionInvocationFilter>],
        function: &'a dyn KernelFunction,
    ) -> Self {
        Self { filters, function }
    }

    /// Runs the next filter, or the function itself at the end of the chain.
    pub fn run<'b>(
        self,
        context: &'b mut FunctionInvocationContext<'_>,
    ) -> BoxFuture<'b, Result<(), FunctionError>>
    where
        'a: 'b,
    {
        async move {
            match self.filters.split_first() {
                Some((filter, rest)) => {
                    let next = Next::new(rest, self.function);
                    filter.on_function_invocation(context, next).await
                }
                None => {
                    context.result = self
                        .function
                        .invoke_core(context.kernel, &context.arguments)
                        .await?;
                    Ok(())
                }
            }
        }
        .boxed()
    }
}
