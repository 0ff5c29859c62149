pub mod platform;
pub mod registry;

pub use registry::TextInputSources;
