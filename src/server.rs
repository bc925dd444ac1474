//! HTTP surface: the form page and the prediction API
//!
//! Serves an HTML page whose form is built from the artifact metadata, plus
//! two JSON endpoints the page's script calls:
//!
//! - `GET /api/schema`  — target name, model names, input field bounds
//! - `GET /api/predict` — run one prediction from query parameters

use crate::artifacts::ArtifactStore;
use crate::error::PredictError;
use crate::form::build_fields;
use crate::metrics::PredictionMetrics;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// The prediction front-end server.
///
/// Artifacts are loaded once and shared read-only across connections; each
/// request is handled in its own task, so a slow prediction blocks only its
/// own connection.
pub struct AppServer {
    store: Arc<ArtifactStore>,
    metrics: Arc<PredictionMetrics>,
}

impl AppServer {
    pub fn new(store: Arc<ArtifactStore>, metrics: Arc<PredictionMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self, host: &str, port: u16) -> Result<()> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).await?;
        info!(addr = %addr, "serving prediction form at http://{addr}/");

        loop {
            let (stream, peer) = listener.accept().await?;
            let store = self.store.clone();
            let metrics = self.metrics.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, store, metrics).await {
                    debug!(peer = %peer, error = %e, "connection error");
                }
            });
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    store: Arc<ArtifactStore>,
    metrics: Arc<PredictionMetrics>,
) -> Result<()> {
    let mut buffer = vec![0u8; 8192];
    let n = stream.read(&mut buffer).await?;
    let request = String::from_utf8_lossy(&buffer[..n]);
    let request_line = request.lines().next().unwrap_or("");

    let response = if request_line.starts_with("GET / ") || request_line.starts_with("GET /index")
    {
        serve_page(&store)
    } else if request_line.starts_with("GET /api/schema") {
        serve_schema(&store)
    } else if request_line.starts_with("GET /api/predict") {
        serve_predict(&store, &metrics, &parse_query(request_line))
    } else {
        http_response(404, "text/plain", "Not Found")
    };

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

/// Extract query parameters from a request line like `GET /path?a=1&b=2 HTTP/1.1`.
fn parse_query(request_line: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    let Some(path) = request_line.split_whitespace().nth(1) else {
        return params;
    };
    let Some((_, query)) = path.split_once('?') else {
        return params;
    };

    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(percent_decode(key), percent_decode(value));
        }
    }
    params
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn serve_schema(store: &ArtifactStore) -> String {
    let body = serde_json::json!({
        "target": store.metadata().target,
        "models": store.model_names(),
        "fields": build_fields(store.metadata()),
    });
    http_response(200, "application/json", &body.to_string())
}

fn serve_predict(
    store: &ArtifactStore,
    metrics: &PredictionMetrics,
    params: &BTreeMap<String, String>,
) -> String {
    let start = Instant::now();

    let Some(model) = params.get("model") else {
        metrics.record_failure();
        return error_response(422, "missing `model` parameter");
    };

    let mut form = BTreeMap::new();
    for name in &store.metadata().feature_names_in {
        if let Some(raw) = params.get(name) {
            match raw.parse::<f64>() {
                Ok(value) => {
                    form.insert(name.clone(), value);
                }
                Err(_) => {
                    metrics.record_failure();
                    return error_response(422, &format!("invalid value for `{name}`: {raw}"));
                }
            }
        }
    }

    match store.predict(model, &form) {
        Ok(prediction) => {
            metrics.record_prediction(model, start.elapsed());
            match serde_json::to_string(&prediction) {
                Ok(body) => http_response(200, "application/json", &body),
                Err(e) => {
                    warn!(error = %e, "failed to encode prediction");
                    error_response(500, "failed to encode prediction")
                }
            }
        }
        Err(e) => {
            metrics.record_failure();
            warn!(model = %model, error = %e, "prediction failed");
            let status = match e {
                PredictError::UnknownModel(_) => 404,
                _ => 422,
            };
            error_response(status, &e.to_string())
        }
    }
}

fn error_response(status: u16, message: &str) -> String {
    let body = serde_json::json!({ "error": message }).to_string();
    http_response(status, "application/json", &body)
}

fn http_response(status: u16, content_type: &str, body: &str) -> String {
    let status_text = match status {
        200 => "OK",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    };

    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        content_type,
        body.len(),
        body
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_STYLE: &str = r#"<style>
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
        background: #f4f5f7;
        color: #1f2933;
        max-width: 640px;
        margin: 0 auto;
        padding: 24px;
    }
    h1 { font-size: 1.5rem; margin-bottom: 4px; }
    .caption { color: #6b7280; margin-top: 0; }
    .card {
        background: #ffffff;
        border: 1px solid #e5e7eb;
        border-radius: 8px;
        padding: 16px;
        margin-bottom: 16px;
    }
    label { display: block; margin-bottom: 12px; font-weight: 500; }
    input[type="number"], select {
        display: block;
        width: 100%;
        box-sizing: border-box;
        margin-top: 4px;
        padding: 8px;
        border: 1px solid #d1d5db;
        border-radius: 6px;
        font-size: 0.95rem;
    }
    button {
        background: #2563eb;
        color: #ffffff;
        border: none;
        border-radius: 6px;
        padding: 10px 20px;
        font-size: 1rem;
        cursor: pointer;
    }
    button:hover { background: #1d4ed8; }
    .result { border-radius: 6px; padding: 12px; margin-top: 16px; }
    .result.idle { background: #eff6ff; color: #1e40af; }
    .result.success { background: #ecfdf5; color: #065f46; font-weight: 600; }
    .result.error { background: #fef2f2; color: #991b1b; }
    details { margin-top: 12px; color: #374151; }
    pre {
        background: #f9fafb;
        border: 1px solid #e5e7eb;
        border-radius: 6px;
        padding: 10px;
        overflow-x: auto;
        font-size: 0.85rem;
    }
</style>"#;

const PAGE_SCRIPT: &str = r#"<script>
    async function predict() {
        const params = new URLSearchParams();
        params.set('model', document.getElementById('model').value);
        document.querySelectorAll('.feature-input').forEach(el => {
            params.set(el.dataset.name, el.value);
        });

        const result = document.getElementById('result');
        try {
            const res = await fetch('/api/predict?' + params.toString());
            const body = await res.json();
            if (res.ok) {
                result.className = 'result success';
                result.textContent = 'Estimated ' + body.target + ' = ' + body.formatted;
                document.getElementById('debug-json').textContent =
                    JSON.stringify({ model: body.model, inputs: body.inputs }, null, 2);
                document.getElementById('debug').style.display = 'block';
            } else {
                result.className = 'result error';
                result.textContent = 'Prediction failed: ' + body.error;
            }
        } catch (err) {
            result.className = 'result error';
            result.textContent = 'Request failed: ' + err;
        }
    }
    document.getElementById('predict').addEventListener('click', predict);
</script>"#;

fn serve_page(store: &ArtifactStore) -> String {
    let target = html_escape(&store.metadata().target);

    let mut options = String::new();
    for name in store.model_names() {
        let name = html_escape(&name);
        options.push_str(&format!("<option value=\"{name}\">{name}</option>\n"));
    }

    let mut inputs = String::new();
    for field in build_fields(store.metadata()) {
        let name = html_escape(&field.name);
        inputs.push_str(&format!(
            "<label>{name}<input class=\"feature-input\" data-name=\"{name}\" \
             type=\"number\" min=\"{}\" max=\"{}\" step=\"any\" value=\"{}\"></label>\n",
            field.min, field.max, field.value
        ));
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Revenue Predictor</title>
{style}
</head>
<body>
<h1>&#127916; Movie Revenue Predictor</h1>
<p class="caption">Pick a model, enter numeric features, and predict the {target}.</p>
<div class="card">
    <label>Model
        <select id="model">
{options}        </select>
    </label>
</div>
<div class="card">
    <h2>Input features</h2>
{inputs}    <button id="predict">Predict</button>
    <div id="result" class="result idle">Set the inputs and click <b>Predict</b>.</div>
    <details id="debug" style="display:none">
        <summary>Debug info</summary>
        <pre id="debug-json"></pre>
    </details>
</div>
{script}
</body>
</html>"#,
        style = PAGE_STYLE,
        options = options,
        inputs = inputs,
        script = PAGE_SCRIPT,
        target = target,
    );

    http_response(200, "text/html; charset=utf-8", &html)
}
