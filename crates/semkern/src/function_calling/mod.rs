//! Automatic invocation of the functions a model asks for.

mod auto_invoke;
mod processor;

pub use auto_invoke::FunctionCallingLoop;
pub use processor::FunctionCallsProcessor;
