#![allow(dead_code)]

use serde_json::json;
use socialbot::{Assistant, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "sk-test";

pub const POST_HTML: &str = r#"
    <html>
    <head><title>Weekend hike</title><style>h1 { color: green; }</style></head>
    <body>
        <h1>Weekend hike</h1>
        <p>We climbed the ridge trail and watched the sunrise.</p>
        <script>trackVisit();</script>
    </body>
    </html>
"#;

pub const EMPTY_HTML: &str = "<html><body><script>app()</script></body></html>";

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new(API_KEY);
    config.api_base = server.uri();
    config.template_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates").into();
    config.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").into();
    config
}

pub fn assistant_for(server: &MockServer) -> Assistant {
    Assistant::new(&config_for(server)).unwrap()
}

pub fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ]
    })
}

pub fn completion_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion_body(text))
}

pub async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

pub async fn mount_completion(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion_response(text))
        .mount(server)
        .await;
}

pub async fn mount_upstream_failure(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(server)
        .await;
}
