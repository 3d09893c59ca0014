//! Test doubles: a loopback HTTP server serving canned responses to the real
//! reqwest clients, plus scripted in-process providers.

use crate::classifier::Classifier;
use crate::error::{CallFailure, ClassificationError};
use crate::llm::{ChatProvider, ChatReply, ChatRequest};
use crate::types::ClassificationResult;
use crate::upload::ImageUpload;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as received by [`MockServer`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    /// Request line plus headers
    pub head: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// Serves responses in order; the last one repeats once the list runs out.
pub(crate) struct MockServer {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start(status: u16, body: &str) -> Self {
        Self::start_sequence(vec![(status, body.to_string())]).await
    }

    pub async fn start_sequence(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let (status, body) = responses[index.min(responses.len() - 1)].clone();
                index += 1;
                handle(stream, status, &body, &recorded).await;
            }
        });

        Self {
            url: format!("http://{addr}/predict/"),
            requests,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one request and record it before answering.
async fn handle(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut request = RecordedRequest {
        head,
        body: Vec::new(),
    };

    let content_length = request
        .header("content-length")
        .and_then(|v| v.parse::<usize>().ok());
    let chunked = request
        .header("transfer-encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"));

    loop {
        let body_len = buf.len() - header_end;
        let done = match content_length {
            Some(len) => body_len >= len,
            None if chunked => buf.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if done {
            break;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    request.body = buf[header_end..].to_vec();
    recorded.lock().unwrap().push(request);

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        if status < 400 { "OK" } else { "Error" },
        body.len()
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok()?;

    Some(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Encode a tiny 8x6 solid image in the given format.
pub(crate) fn sample_image(format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 6, image::Rgb([40, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

type ReplyFn = dyn Fn(u32) -> Result<ChatReply, CallFailure> + Send + Sync;

/// A scripted chat provider that records every request it receives.
///
/// Clones share state, so a test can keep one handle while the session owns
/// the boxed provider.
#[derive(Clone)]
pub(crate) struct MockProvider {
    response_fn: Arc<ReplyFn>,
    call_count: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    fn from_fn(f: impl Fn(u32) -> Result<ChatReply, CallFailure> + Send + Sync + 'static) -> Self {
        Self {
            response_fn: Arc::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_| Ok(reply(&text)))
    }

    /// Replies with `texts[i]` on call `i`, repeating the last one.
    pub fn replying_in_order(texts: &[&str]) -> Self {
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        Self::from_fn(move |idx| {
            let i = (idx as usize).min(texts.len() - 1);
            Ok(reply(&texts[i]))
        })
    }

    pub fn failing(make_error: impl Fn() -> CallFailure + Send + Sync + 'static) -> Self {
        Self::from_fn(move |_| Err(make_error()))
    }

    /// Succeeds except on the given zero-based call index.
    pub fn failing_on_call(fail_at: u32, text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |idx| {
            if idx == fail_at {
                Err(CallFailure::Status {
                    status: 429,
                    body: "rate limited".to_string(),
                })
            } else {
                Ok(reply(&text))
            }
        })
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn reply(text: &str) -> ChatReply {
    ChatReply {
        text: text.to_string(),
        model: "mock-v1".to_string(),
        tokens_used: Some(42),
        latency_ms: 10,
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, CallFailure> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.response_fn)(idx)
    }
}

/// A classifier that returns a fixed outcome and counts calls.
#[derive(Clone)]
pub(crate) struct MockClassifier {
    outcome: Arc<dyn Fn() -> Result<ClassificationResult, ClassificationError> + Send + Sync>,
    call_count: Arc<AtomicU32>,
}

impl MockClassifier {
    fn from_fn(
        f: impl Fn() -> Result<ClassificationResult, ClassificationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            outcome: Arc::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn returning(prediction: &str, probability: f64) -> Self {
        let prediction = prediction.to_string();
        Self::from_fn(move || {
            Ok(ClassificationResult {
                prediction: prediction.clone(),
                probability,
            })
        })
    }

    pub fn server_error() -> Self {
        Self::from_fn(|| {
            Err(CallFailure::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            }
            .into())
        })
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        _upload: &ImageUpload,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}
