//! Six photographic views of a subject from one reference image.
//!
//! ```no_run
//! use rgenviews::{GeminiConfig, ViewOrchestrator};
//!
//! # async fn run() -> rgenviews::Result<()> {
//! let orchestrator = ViewOrchestrator::from_config(GeminiConfig::from_env()?)?;
//! let image = rgenviews::encoder::encode_file("reference.png")?;
//! let run = orchestrator.generate_views(&image).await?;
//! println!("{}", rgenviews::render::summary_table(&run));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod render;
#[cfg(feature = "server")]
pub mod server;

pub use catalog::VIEW_CATALOG;
pub use config::{GeminiConfig, ServerConfig};
pub use error::{Result, ViewsError};
pub use gemini::{GeminiClient, ImageGenerator};
pub use models::{
    EncodedImage, GenerationRun, InlineData, ViewDescriptor, ViewResult, ViewType,
};
pub use orchestrator::ViewOrchestrator;
