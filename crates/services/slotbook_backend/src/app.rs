// File: services/slotbook_backend/src/app.rs
use crate::app_state::AppState;
use axum::extract::{DefaultBodyLimit, OriginalUri, Request};
use axum::response::IntoResponse;
use axum::Router;
use http::{header, HeaderValue, Method};
use slotbook_common::handlers::fallback_handler;
use slotbook_config::AppConfig;
use std::path::Path;
use tower::ServiceExt;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Served for every client route the static directory has no file for.
const CLIENT_ENTRY_POINT: &str = "index.html";

/// Build the full application router.
pub fn build_app(state: &AppState) -> Router {
    let config = state.config.as_ref();
    let static_dir = config.server.static_dir.as_deref().filter(|dir| {
        let exists = Path::new(dir).is_dir();
        if !exists {
            warn!("Static directory {} does not exist; not serving files", dir);
        }
        exists
    });

    // A served client owns `/`; the API index stays reachable at `/api`.
    let common = match static_dir {
        Some(_) => slotbook_common::api_routes(state.common.clone()),
        None => slotbook_common::routes(state.common.clone()),
    };

    let mut app = Router::new()
        .nest(
            "/api/appointments",
            slotbook_booking::routes(state.booking.clone()),
        )
        .merge(common);

    // Swagger UI and the JSON document, when built with the openapi feature
    #[cfg(feature = "openapi")]
    {
        use slotbook_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotbook API",
                version = "0.1.0",
                description = "Appointment booking service",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app = match static_dir {
        Some(dir) => {
            info!("Serving static client from {}", dir);
            let client = ServeDir::new(dir)
                .fallback(ServeFile::new(Path::new(dir).join(CLIENT_ENTRY_POINT)));
            app.fallback(
                move |method: Method, uri: OriginalUri, request: Request| async move {
                    if is_api_path(uri.path()) {
                        return fallback_handler(method, uri).await.into_response();
                    }
                    match client.oneshot(request).await {
                        Ok(response) => response.into_response(),
                        Err(never) => match never {},
                    }
                },
            )
        }
        None => app.fallback(fallback_handler),
    };

    app = app
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer(config));

    if config.is_development() {
        app = app.layer(TraceLayer::new_for_http());
    }

    if config.is_production() {
        app = app
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ));
    }

    app
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// CORS for the configured client origins.
///
/// With no origins configured, the mail `frontend_url` (or the local dev
/// client) is allowed, since the confirmation links point there.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        let fallback = config
            .mail
            .as_ref()
            .and_then(|mail| mail.frontend_url.as_deref())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_FRONTEND_ORIGIN);
        origins.push(
            HeaderValue::from_str(fallback.trim_end_matches('/'))
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_FRONTEND_ORIGIN)),
        );
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
