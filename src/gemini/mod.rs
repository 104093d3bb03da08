pub mod image_client;

use crate::{
    error::Result,
    models::{EncodedImage, InlineData},
};
use async_trait::async_trait;

pub use image_client::GeminiClient;

/// One remote image-to-image generation call.
///
/// Implementations are shared by reference across concurrent calls, so they
/// must not need `&mut self`.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, image: &EncodedImage, prompt: &str) -> Result<InlineData>;
}

#[async_trait]
impl<T: ImageGenerator + ?Sized> ImageGenerator for std::sync::Arc<T> {
    async fn generate(&self, image: &EncodedImage, prompt: &str) -> Result<InlineData> {
        (**self).generate(image, prompt).await
    }
}
