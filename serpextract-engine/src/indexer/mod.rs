mod builder;
pub mod country;
mod library;

pub use builder::RuleCompiler;
pub use library::EngineIndex;
