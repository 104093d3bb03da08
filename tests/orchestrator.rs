use async_trait::async_trait;
use rgenviews::{
    EncodedImage, GenerationRun, ImageGenerator, InlineData, Result, ViewOrchestrator,
    ViewType, ViewsError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

fn view_for_prompt(prompt: &str) -> ViewType {
    ViewType::ALL
        .into_iter()
        .find(|view| prompt.starts_with(view.as_str()))
        .expect("every prompt names its view")
}

/// Scripted generator: per-view delay and failure, records dispatches and
/// the order in which requests complete.
#[derive(Default)]
struct Scripted {
    failing: Vec<ViewType>,
    delays_ms: HashMap<ViewType, u64>,
    dispatched: AtomicUsize,
    completed: Mutex<Vec<ViewType>>,
}

impl Scripted {
    fn failing(views: &[ViewType]) -> Self {
        Self {
            failing: views.to_vec(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ImageGenerator for Scripted {
    async fn generate(&self, _image: &EncodedImage, prompt: &str) -> Result<InlineData> {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        let view = view_for_prompt(prompt);

        if let Some(ms) = self.delays_ms.get(&view) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.completed.lock().unwrap().push(view);

        if self.failing.contains(&view) {
            return Err(ViewsError::RequestError(format!("{} exploded", view)));
        }
        Ok(InlineData {
            mime_type: "image/png".to_string(),
            data: format!("{}-bytes", view.slug()),
        })
    }
}

fn absent_views(run: &GenerationRun) -> Vec<ViewType> {
    run.iter()
        .filter(|result| result.image_data_uri.is_none())
        .map(|result| result.label)
        .collect()
}

async fn run_with(generator: Scripted) -> (GenerationRun, Scripted) {
    let orchestrator = ViewOrchestrator::new(generator);
    let run = orchestrator.generate_from_bytes(PNG).await.unwrap();
    (run, orchestrator.into_generator())
}

#[tokio::test]
async fn all_views_succeed_in_catalog_order() {
    let (run, generator) = run_with(Scripted::default()).await;

    assert_eq!(run.labels(), ViewType::ALL.to_vec());
    assert_eq!(run.succeeded(), 6);
    assert_eq!(generator.dispatched.load(Ordering::SeqCst), 6);
    assert_eq!(
        run.get(ViewType::Top).unwrap().image_data_uri.as_deref(),
        Some("data:image/png;base64,top-bytes")
    );
}

#[tokio::test]
async fn single_failure_is_isolated() {
    let (run, _) = run_with(Scripted::failing(&[ViewType::Left])).await;

    assert_eq!(run.labels(), ViewType::ALL.to_vec());
    assert_eq!(absent_views(&run), vec![ViewType::Left]);
    assert_eq!(run.succeeded(), 5);
}

#[tokio::test]
async fn total_failure_still_returns_six_slots() {
    let (run, _) = run_with(Scripted::failing(&ViewType::ALL)).await;

    assert_eq!(run.len(), 6);
    assert_eq!(run.labels(), ViewType::ALL.to_vec());
    assert_eq!(absent_views(&run), ViewType::ALL.to_vec());
}

#[tokio::test(start_paused = true)]
async fn order_is_independent_of_completion() {
    let generator = Scripted {
        delays_ms: HashMap::from([
            (ViewType::Front, 500),
            (ViewType::Back, 400),
            (ViewType::Right, 10),
        ]),
        ..Default::default()
    };
    let (run, generator) = run_with(generator).await;

    let completed = generator.completed.lock().unwrap().clone();
    let right_pos = completed.iter().position(|v| *v == ViewType::Right).unwrap();
    let front_pos = completed.iter().position(|v| *v == ViewType::Front).unwrap();
    assert!(right_pos < front_pos, "Right should finish first: {:?}", completed);
    assert_eq!(completed.last(), Some(&ViewType::Front));

    assert_eq!(run.labels(), ViewType::ALL.to_vec());
    assert_eq!(run.results[0].label, ViewType::Front);
}

#[tokio::test(start_paused = true)]
async fn requests_run_concurrently() {
    let generator = Scripted {
        delays_ms: ViewType::ALL.into_iter().map(|v| (v, 1_000)).collect(),
        ..Default::default()
    };
    let started = tokio::time::Instant::now();
    let (run, _) = run_with(generator).await;

    assert_eq!(run.succeeded(), 6);
    assert!(started.elapsed() < Duration::from_millis(2_000));
}

#[tokio::test]
async fn decode_error_dispatches_nothing() {
    let orchestrator = ViewOrchestrator::new(Scripted::default());

    let err = orchestrator
        .generate_from_bytes(b"definitely not an image")
        .await
        .unwrap_err();
    assert!(matches!(err, ViewsError::DecodeError(_)));

    let err = orchestrator.generate_from_bytes(&[]).await.unwrap_err();
    assert!(matches!(err, ViewsError::DecodeError(_)));

    assert_eq!(orchestrator.generator().dispatched.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn runs_are_shaped_alike_across_calls() {
    let orchestrator = ViewOrchestrator::new(Scripted::failing(&[ViewType::Bottom]));
    let image = rgenviews::encoder::encode_bytes(PNG).unwrap();

    let first = orchestrator.generate_views(&image).await.unwrap();
    let second = orchestrator.generate_views(&image).await.unwrap();

    assert_eq!(first.labels(), second.labels());
    assert_eq!(absent_views(&first), absent_views(&second));
    assert_eq!(orchestrator.generator().dispatched.load(Ordering::SeqCst), 12);
}
