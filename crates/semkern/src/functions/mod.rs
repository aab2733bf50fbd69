//! Functions, plugins and the machinery to invoke them.

mod arguments;
mod filter;
mod from_prompt;
mod function;
pub mod function_name;
pub mod native;
mod plugin;

pub use arguments::KernelArguments;
pub use filter::{FunctionInvocationContext, FunctionInvocationFilter, Next};
pub use from_prompt::KernelFunctionFromPrompt;
pub use function::{FunctionMetadata, FunctionResult, FunctionValue, KernelFunction};
pub use function_name::FunctionName;
pub use native::{NativeFunction, helpers};
pub use plugin::{KernelPlugin, KernelPlugins, RegisteredFunction};
