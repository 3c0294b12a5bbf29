//! Test doubles: a recording transport and service-account key fixtures.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing_subscriber::fmt::MakeWriter;

use crate::client::AdsClient;
use crate::config::{AdsConfig, ADWORDS_SCOPE};
use crate::error::{AdsError, AdsResult};
use crate::request::RequestHeaders;
use crate::transport::{HttpResponse, Transport};

const TEST_RSA_KEY: &str = include_str!("../testdata/test_rsa_key.pem");

pub(crate) const TEST_HOST: &str = "googleads.example.test";

#[derive(Debug, Clone)]
pub(crate) struct JsonRequest {
    pub url: String,
    pub headers: RequestHeaders,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub(crate) struct FormRequest {
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl FormRequest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Records every request and replays queued API responses in order.
/// When the queue is empty, API calls answer `200 {}`.
pub(crate) struct FakeTransport {
    token_response: HttpResponse,
    responses: Mutex<VecDeque<AdsResult<HttpResponse>>>,
    json_requests: Mutex<Vec<JsonRequest>>,
    form_requests: Mutex<Vec<FormRequest>>,
}

impl FakeTransport {
    pub const TOKEN: &'static str = "ya29.test-token";

    pub fn new() -> Self {
        Self {
            token_response: HttpResponse::new(
                200,
                json!({"access_token": Self::TOKEN, "expires_in": 3599, "token_type": "Bearer"}).to_string(),
            ),
            responses: Mutex::new(VecDeque::new()),
            json_requests: Mutex::new(Vec::new()),
            form_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token_response(mut self, status: u16, body: &str) -> Self {
        self.token_response = HttpResponse::new(status, body);
        self
    }

    pub fn with_response(self, status: u16, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    pub fn with_raw_response(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn with_transport_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(AdsError::Transport(message.to_string())));
        self
    }

    pub fn json_requests(&self) -> Vec<JsonRequest> {
        self.json_requests.lock().unwrap().clone()
    }

    pub fn form_requests(&self) -> Vec<FormRequest> {
        self.form_requests.lock().unwrap().clone()
    }

    /// Query text of every search request, in order
    pub fn queries(&self) -> Vec<String> {
        self.json_requests()
            .iter()
            .filter_map(|r| r.body.get("query").and_then(Value::as_str).map(String::from))
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post_json(&self, url: &str, headers: &RequestHeaders, body: &Value) -> AdsResult<HttpResponse> {
        self.json_requests.lock().unwrap().push(JsonRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> AdsResult<HttpResponse> {
        self.form_requests.lock().unwrap().push(FormRequest {
            url: url.to_string(),
            fields: form.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        Ok(self.token_response.clone())
    }
}

pub(crate) fn scopes() -> Vec<String> {
    vec![ADWORDS_SCOPE.to_string()]
}

/// Write a service-account key file signed with the bundled test key.
pub(crate) fn write_key_file(token_uri: &str) -> NamedTempFile {
    let key = json!({
        "type": "service_account",
        "project_id": "ads-test",
        "private_key_id": "test-key-id",
        "private_key": TEST_RSA_KEY,
        "client_email": "ads-bot@ads-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(key.to_string().as_bytes()).unwrap();
    file
}

pub(crate) struct Harness {
    pub client: AdsClient,
    pub transport: Arc<FakeTransport>,
    _key: NamedTempFile,
}

/// An `AdsClient` wired to `transport` with a valid key file and configuration.
pub(crate) fn harness(transport: FakeTransport) -> Harness {
    let key = write_key_file("https://oauth2.example.test/token");
    let transport = Arc::new(transport);
    let config = AdsConfig::new(Some(key.path().to_path_buf()), "dev-token", "111-222-3333")
        .with_api_host(TEST_HOST);

    Harness {
        client: AdsClient::with_transport(config, transport.clone()),
        transport,
        _key: key,
    }
}

/// Collects formatted log lines emitted on the current thread while installed.
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
