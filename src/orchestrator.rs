//! Fan-out/fan-in over the view catalog.
//!
//! Every view is its own failure domain: a branch that errors or times out
//! becomes an absent result for that view and the rest of the run carries on.

use crate::{
    catalog::VIEW_CATALOG,
    config::GeminiConfig,
    encoder,
    error::{Result, ViewsError},
    gemini::{GeminiClient, ImageGenerator},
    logger,
    models::{EncodedImage, GenerationRun, InlineData, ViewDescriptor, ViewResult},
};
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

pub struct ViewOrchestrator<G> {
    generator: G,
    view_timeout: Option<Duration>,
}

impl ViewOrchestrator<GeminiClient> {
    /// Build a Gemini-backed orchestrator, honouring the configured per-view timeout.
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let view_timeout = config.view_timeout;
        let client = GeminiClient::new(config)?;
        Ok(Self {
            generator: client,
            view_timeout,
        })
    }
}

impl<G: ImageGenerator> ViewOrchestrator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            view_timeout: None,
        }
    }

    /// Bound each view's request on its own; siblings are never cancelled.
    pub fn with_view_timeout(mut self, timeout: Duration) -> Self {
        self.view_timeout = Some(timeout);
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Generate every catalog view from one reference image.
    ///
    /// Waits for all requests to settle and returns one result per view in
    /// catalog order. Only an invalid `image` makes this fail.
    pub async fn generate_views(&self, image: &EncodedImage) -> Result<GenerationRun> {
        image.validate()?;

        let _timer = logger::timer("generate_views");
        log::info!(
            "Dispatching {} view requests ({})",
            VIEW_CATALOG.len(),
            image.mime_type
        );

        let branches = VIEW_CATALOG
            .iter()
            .map(|descriptor| self.generate_view(image, descriptor));
        let results = join_all(branches).await;

        let run = GenerationRun::new(results);
        log::info!(
            "Generation finished: {} succeeded, {} failed",
            run.succeeded(),
            run.failed()
        );
        Ok(run)
    }

    /// Encode raw upload bytes and generate. Nothing is dispatched if the
    /// bytes are not a recognizable image.
    pub async fn generate_from_bytes(&self, bytes: &[u8]) -> Result<GenerationRun> {
        let image = encoder::encode_bytes(bytes)?;
        self.generate_views(&image).await
    }

    async fn generate_view(
        &self,
        image: &EncodedImage,
        descriptor: &ViewDescriptor,
    ) -> ViewResult {
        let request = self.generator.generate(image, descriptor.prompt_text);
        let outcome = bounded(self.view_timeout, request).await;

        match outcome {
            Ok(inline) => {
                log::debug!("{} view generated ({})", descriptor.label, inline.mime_type);
                ViewResult::success(descriptor.label, inline.to_data_uri())
            }
            Err(e) => {
                log::error!("Failed to generate {} view: {}", descriptor.label, e);
                ViewResult::failed(descriptor.label)
            }
        }
    }
}

async fn bounded<F>(limit: Option<Duration>, request: F) -> Result<InlineData>
where
    F: Future<Output = Result<InlineData>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| Err(ViewsError::Timeout(limit.as_millis() as u64))),
        None => request.await,
    }
}
