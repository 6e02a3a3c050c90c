//! OpenAI-compatible chat-completion client.
//!
//! Supports tool-use (function calling) and SSE streaming.

use super::{ChunkStream, CompletionBackend, CompletionRequest, InferenceError, ToolChoice};
use crate::types::*;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed per-call timeouts.
#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    /// Whole call, including reading the body.
    pub request: Duration,
    pub connect: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(180),
            connect: Duration::from_secs(15),
        }
    }
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Built once at startup; `reqwest::Client` pools connections internally so
/// clones are cheap and share the pool.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

// -- OpenAI-compatible request/response types --------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolPayload<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    temperature: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ToolPayload<'a> {
    r#type: &'a str,
    function: FunctionPayload<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionPayload<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ToolCallPayload {
    #[serde(default)]
    id: String,
    function: FunctionCallPayload,
}

#[derive(Debug, Deserialize)]
struct FunctionCallPayload {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<UsagePayload>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallPayload>>,
}

#[derive(Debug, Deserialize)]
struct UsagePayload {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

impl ChunkPayload {
    fn into_chunk(self) -> StreamChunk {
        StreamChunk {
            content: self.choices.into_iter().next().and_then(|c| c.delta.content),
        }
    }
}

impl OpenAiClient {
    /// Create a new client with fixed timeouts.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeouts: HttpTimeouts,
    ) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn payload<'a>(request: &'a CompletionRequest, stream: bool) -> ChatRequest<'a> {
        // tool_choice without tools is rejected upstream
        let tools: Option<Vec<ToolPayload>> = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|t| ToolPayload {
                        r#type: "function",
                        function: FunctionPayload {
                            name: &t.name,
                            description: &t.description,
                            parameters: &t.parameters,
                        },
                    })
                    .collect(),
            )
        };
        let tool_choice = tools.as_ref().and(request.tool_choice);

        ChatRequest {
            model: &request.model,
            messages: &request.messages,
            tools,
            tool_choice,
            temperature: request.temperature,
            stream,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, InferenceError> {
        debug!(
            "Inference request to model: {} ({} messages, {} tools)",
            request.model,
            request.messages.len(),
            request.tools.len()
        );

        let resp = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&Self::payload(&request, false))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = resp.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyResponse)?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(Completion {
            content: choice.message.content,
            tool_calls,
            usage,
        })
    }

    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, InferenceError> {
        debug!("Streaming inference request to model: {}", request.model);

        let mut source = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&Self::payload(&request, true))
            .eventsource()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let chunks = async_stream::stream! {
            while let Some(event) = source.next().await {
                match event {
                    Ok(Event::Open) => continue,
                    Ok(Event::Message(message)) => {
                        let data = message.data.trim();
                        if data == "[DONE]" {
                            break;
                        }
                        if data.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ChunkPayload>(data) {
                            Ok(payload) => {
                                yield Ok(payload.into_chunk());
                            }
                            Err(e) => {
                                yield Err(InferenceError::from(e));
                                break;
                            }
                        }
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => break,
                    Err(e) => {
                        yield Err(map_eventsource_error(e).await);
                        break;
                    }
                }
            }
            source.close();
        };

        Ok(Box::pin(chunks))
    }
}

async fn map_eventsource_error(err: reqwest_eventsource::Error) -> InferenceError {
    use reqwest_eventsource::Error;

    match err {
        Error::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            InferenceError::Status {
                status: status.as_u16(),
                body,
            }
        }
        Error::InvalidContentType(content_type, _) => InferenceError::Decode(format!(
            "unexpected content type {:?} for event stream",
            content_type
        )),
        Error::Transport(e) => InferenceError::from(e),
        other => {
            warn!("Event stream failure: {}", other);
            InferenceError::Stream(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool_catalog;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(url: &str) -> OpenAiClient {
        OpenAiClient::new(url, "sk-test", HttpTimeouts::default()).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "gpt-test",
            vec![ChatMessage::system("sys"), ChatMessage::user("who won?")],
            0.2,
        )
    }

    #[tokio::test]
    async fn complete_sends_tools_and_keeps_raw_arguments() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-test",
                "tool_choice": "auto",
                "temperature": 0.2,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "who won?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{
                        "message": {
                            "content": null,
                            "tool_calls": [{
                                "id": "call_1",
                                "type": "function",
                                "function": {"name": "get_team_news", "arguments": "{\"team_name\":"}
                            }]
                        }
                    }],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let completion = client(&server.url())
            .complete(request().with_tools(tool_catalog(), ToolChoice::Auto))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, None);
        assert_eq!(
            completion.tool_calls,
            vec![ToolCall {
                id: "call_1".into(),
                name: "get_team_news".into(),
                arguments: "{\"team_name\":".into(),
            }]
        );
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[test]
    fn payload_omits_tools_and_choice_when_catalog_is_empty() {
        let mut req = request();
        req.tool_choice = Some(ToolChoice::Auto);
        let value = serde_json::to_value(OpenAiClient::payload(&req, false)).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("stream").is_none());

        let value = serde_json::to_value(OpenAiClient::payload(&req, true)).unwrap();
        assert_eq!(value["stream"], json!(true));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = client(&server.url()).complete(request()).await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::Status {
                status: 429,
                body: "rate limited".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = client(&server.url()).complete(request()).await.unwrap_err();
        assert_eq!(err, InferenceError::EmptyResponse);
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client(&server.url()).complete(request()).await.unwrap_err();
        assert_eq!(err.kind(), "MalformedResponse");
    }

    #[tokio::test]
    async fn stream_yields_deltas_until_done() {
        let mut server = mockito::Server::new_async().await;
        let body = [
            r#"{"choices":[{"delta":{"role":"assistant"}}]}"#,
            r#"{"choices":[{"delta":{"content":"Arsenal "}}]}"#,
            r#"{"choices":[{"delta":{"content":"won."}}]}"#,
            "[DONE]",
            r#"{"choices":[{"delta":{"content":"ignored"}}]}"#,
        ]
        .iter()
        .map(|d| format!("data: {d}\n\n"))
        .collect::<String>();

        server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let chunks: Vec<_> = client(&server.url())
            .stream(request())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![
                Ok(StreamChunk::empty()),
                Ok(StreamChunk::text("Arsenal ")),
                Ok(StreamChunk::text("won.")),
            ]
        );
    }

    /// Read one HTTP request (headers plus `Content-Length` body) off a socket.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert_ne!(n, 0, "client hung up before sending the request");
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    #[tokio::test]
    async fn dropping_stream_mid_flight_closes_upstream_connection() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let upstream = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            let event = "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n\n";
            let head = "HTTP/1.1 200 OK\r\n\
                        content-type: text/event-stream\r\n\
                        transfer-encoding: chunked\r\n\r\n";
            let body = format!("{:x}\r\n{}\r\n", event.len(), event);
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            // The response never finishes; the next read only returns once
            // the client side closes the socket.
            let mut rest = [0u8; 64];
            tokio::time::timeout(Duration::from_secs(5), socket.read(&mut rest))
                .await
                .expect("upstream connection was not released")
                .unwrap()
        });

        let mut chunks = client(&format!("http://{addr}"))
            .stream(request())
            .await
            .unwrap();
        assert_eq!(chunks.next().await, Some(Ok(StreamChunk::text("hi"))));
        drop(chunks);

        assert_eq!(upstream.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stream_rejected_upstream_yields_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let chunks: Vec<_> = client(&server.url())
            .stream(request())
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![Err(InferenceError::Status {
                status: 401,
                body: "bad key".into()
            })]
        );
    }
}
