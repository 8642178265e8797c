// handlers/public/docs.rs - GET /api/docs and GET /api/docs.json

use axum::{extract::State, response::Html, Json};
use utoipa::openapi::OpenApi;

use crate::state::AppState;

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8" />
  <title>Veterinaria API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api/docs.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// GET /api/docs - Interactive Swagger UI bound to `/api/docs.json`
pub async fn docs_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// GET /api/docs.json - Raw OpenAPI document
pub async fn docs_json(State(state): State<AppState>) -> Json<OpenApi> {
    Json(state.docs.as_ref().clone())
}
