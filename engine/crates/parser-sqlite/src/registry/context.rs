mod input;
mod names;
mod output;

pub use input::ArgumentNames;
pub(crate) use input::InputContext;
pub(crate) use names::FieldNamer;
pub(crate) use output::OutputContext;
