pub mod custom_search;
pub mod demo_provider;
pub mod extractor;
pub mod gemini_client;
pub mod normalizer;
pub mod prompt_builder;
pub mod provider;

pub use custom_search::*;
pub use demo_provider::*;
pub use extractor::*;
pub use gemini_client::*;
pub use normalizer::*;
pub use prompt_builder::*;
pub use provider::*;
