pub mod assembler;
pub mod executor;
pub mod interpreter;
pub mod prompt;

pub use executor::EnrichExecutor;
