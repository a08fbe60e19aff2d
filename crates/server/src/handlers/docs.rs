use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse};

const OPENAPI_JSON: &str = include_str!("../../res/openapi.json");
const DOCS_HTML: &str = include_str!("../../res/docs.html");

pub async fn openapi() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], OPENAPI_JSON)
}

pub async fn openapi_html() -> Html<&'static str> {
    Html(DOCS_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_openapi_is_json() {
        let doc: serde_json::Value = serde_json::from_str(OPENAPI_JSON).expect("openapi json");
        assert!(doc["paths"].get("/api/projects").is_some());
        assert!(doc["paths"].get("/api/contact").is_some());
    }
}
