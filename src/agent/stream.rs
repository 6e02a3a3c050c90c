//! Streaming query handler: relays upstream text as it arrives.

use crate::agent::context::build_stream_messages;
use crate::agent::query::preview;
use crate::agent::system_prompt::stream_system_prompt;
use crate::inference::{CompletionBackend, CompletionRequest, InferenceError};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// One piece of streamed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Non-empty generated text, relayed verbatim.
    Text(String),
    /// Final fragment describing why the stream stopped early.
    Diagnostic(String),
}

impl Fragment {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Diagnostic(text) => text,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Lazy, finite, non-restartable sequence of fragments.
pub type FragmentStream = BoxStream<'static, Fragment>;

#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub model: String,
    pub temperature: f64,
}

pub struct StreamHandler {
    backend: Arc<dyn CompletionBackend>,
    options: StreamOptions,
    system_prompt: String,
}

impl StreamHandler {
    pub fn new(backend: Arc<dyn CompletionBackend>, options: StreamOptions) -> Self {
        Self {
            backend,
            options,
            system_prompt: stream_system_prompt(),
        }
    }

    /// Stream the answer to `query`.
    ///
    /// Nothing is sent upstream until the stream is first polled. Chunks
    /// without content are skipped. Any failure ends the stream with one
    /// [`Fragment::Diagnostic`]. Dropping the stream early releases the
    /// upstream connection.
    pub fn stream(&self, query: &str) -> FragmentStream {
        info!("Streaming query: '{}'", preview(query));

        let backend = Arc::clone(&self.backend);
        let request = CompletionRequest::new(
            &self.options.model,
            build_stream_messages(&self.system_prompt, query),
            self.options.temperature,
        );

        let fragments = async_stream::stream! {
            let mut chunks = match backend.stream(request).await {
                Ok(chunks) => chunks,
                Err(e) => {
                    error!("Failed to open upstream stream: {}", e);
                    yield diagnostic(&e);
                    return;
                }
            };

            let mut relayed = 0usize;
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(chunk) => match chunk.content {
                        Some(text) if !text.is_empty() => {
                            relayed += 1;
                            yield Fragment::Text(text);
                        }
                        _ => continue,
                    },
                    Err(e) => {
                        error!("Upstream stream failed after {} fragments: {}", relayed, e);
                        yield diagnostic(&e);
                        return;
                    }
                }
            }
            debug!("Stream finished after {} fragments", relayed);
        };

        Box::pin(fragments)
    }
}

fn diagnostic(err: &InferenceError) -> Fragment {
    Fragment::Diagnostic(format!("Error: {} - {}", err.kind(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ChunkStream;
    use crate::types::{ChatMessage, ChatRole, Completion, StreamChunk};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Script {
        Chunks(Vec<Result<StreamChunk, InferenceError>>),
        OpenFails(InferenceError),
    }

    struct ScriptedBackend {
        script: Mutex<Option<Script>>,
        calls: AtomicUsize,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedBackend {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(Some(script)),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _request: CompletionRequest) -> Result<Completion, InferenceError> {
            unreachable!("stream handler never calls complete")
        }

        async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(request);
            match self.script.lock().unwrap().take() {
                Some(Script::Chunks(chunks)) => Ok(futures::stream::iter(chunks).boxed()),
                Some(Script::OpenFails(e)) => Err(e),
                None => panic!("stream opened twice"),
            }
        }
    }

    fn handler(backend: Arc<ScriptedBackend>) -> StreamHandler {
        StreamHandler::new(
            backend,
            StreamOptions {
                model: "gpt-stream".into(),
                temperature: 0.2,
            },
        )
    }

    #[tokio::test]
    async fn empty_chunks_are_skipped_and_order_preserved() {
        let backend = ScriptedBackend::new(Script::Chunks(vec![
            Ok(StreamChunk::empty()),
            Ok(StreamChunk::text("Liverpool ")),
            Ok(StreamChunk::text("")),
            Ok(StreamChunk::text("top ")),
            Ok(StreamChunk::empty()),
            Ok(StreamChunk::text("the table.")),
        ]));

        let fragments: Vec<Fragment> = handler(backend).stream("who leads?").collect().await;

        assert_eq!(
            fragments,
            vec![
                Fragment::Text("Liverpool ".into()),
                Fragment::Text("top ".into()),
                Fragment::Text("the table.".into()),
            ]
        );
    }

    #[tokio::test]
    async fn request_is_two_turns_without_tools() {
        let backend = ScriptedBackend::new(Script::Chunks(vec![]));
        let _: Vec<Fragment> = handler(backend.clone()).stream("hi").collect().await;

        let request = backend.seen.lock().unwrap().take().unwrap();
        assert_eq!(request.model, "gpt-stream");
        assert!(request.tools.is_empty());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert_eq!(request.messages[1], ChatMessage::user("hi"));
    }

    #[tokio::test]
    async fn text_is_not_link_stripped() {
        let backend = ScriptedBackend::new(Script::Chunks(vec![Ok(StreamChunk::text(
            "see https://x.test",
        ))]));
        let fragments: Vec<Fragment> = handler(backend).stream("q").collect().await;
        assert_eq!(fragments, vec![Fragment::Text("see https://x.test".into())]);
    }

    #[tokio::test]
    async fn mid_stream_failure_ends_with_one_diagnostic() {
        let backend = ScriptedBackend::new(Script::Chunks(vec![
            Ok(StreamChunk::text("Half")),
            Err(InferenceError::Stream("connection reset".into())),
            Ok(StreamChunk::text("never seen")),
        ]));

        let fragments: Vec<Fragment> = handler(backend).stream("q").collect().await;

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], Fragment::Text("Half".into()));
        assert!(fragments[1].is_diagnostic());
        assert_eq!(
            fragments[1].as_text(),
            "Error: StreamError - stream interrupted: connection reset"
        );
    }

    #[tokio::test]
    async fn open_failure_yields_single_diagnostic() {
        let backend = ScriptedBackend::new(Script::OpenFails(InferenceError::Connect(
            "refused".into(),
        )));

        let fragments: Vec<Fragment> = handler(backend).stream("q").collect().await;

        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].is_diagnostic());
        assert!(fragments[0].to_string().contains("ConnectionError"));
    }

    #[tokio::test]
    async fn nothing_is_sent_until_polled() {
        let backend = ScriptedBackend::new(Script::Chunks(vec![]));
        let stream = handler(backend.clone()).stream("q");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        drop(stream);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
