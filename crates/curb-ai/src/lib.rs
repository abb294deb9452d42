pub mod ai_provider;
pub mod config;
pub mod fallback;
pub mod generator;
pub mod providers;
pub mod scolding;

pub use ai_provider::{create_provider, AiProviderTrait, GenerationOptions};
pub use config::{AiConfig, AiProvider};
pub use fallback::FallbackMessages;
pub use generator::MessageGenerator;
pub use scolding::ScoldingService;
