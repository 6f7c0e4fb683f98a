use crate::config::AppConfig;
use crate::core::services::MyFeedbackService;
use crate::infrastructure::traits::MessageRepository;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use di::{Injectable, Ref, ServiceCollection, ValidationError, singleton_factory};
use di_axum::RouterServiceProviderExtensions;
use log::error;
use minijinja::Environment;
use std::sync::LazyLock;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

pub mod admin;
pub mod feedback;

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../../templates/index.html"))
        .expect("index.html should be a valid template");
    env.add_template("admin.html", include_str!("../../templates/admin.html"))
        .expect("admin.html should be a valid template");
    env
});

/// The whole app: routes plus the service provider handlers inject from.
pub fn app(
    config: Ref<AppConfig>,
    repository: Ref<dyn MessageRepository>,
) -> Result<Router, ValidationError> {
    let registered_config = config.clone();
    let provider = ServiceCollection::new()
        .add(singleton_factory(move |_| registered_config.clone()))
        .add(singleton_factory(move |_| repository.clone()))
        .add(MyFeedbackService::scoped())
        .build_provider()?;

    Ok(router(&config).with_provider(provider))
}

/// Routes of the app. The caller attaches the service provider.
pub fn router(config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(feedback::index))
        .route("/submit", post(feedback::submit))
        .route(&config.admin_path, get(admin::list_messages))
        .nest_service(
            "/static",
            ServiceBuilder::new().service(ServeDir::new(&config.static_dir)),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}

pub(crate) fn render(name: &str, context: minijinja::Value) -> Result<Html<String>, StatusCode> {
    TEMPLATES
        .get_template(name)
        .and_then(|template| template.render(context))
        .map(Html)
        .map_err(|e| {
            error!("failed to render {name}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Sends the browser back to the form with a message to display.
pub(crate) fn redirect_with_notice(notice: &str) -> Redirect {
    Redirect::to(&format!("/?notice={}", urlencoding::encode(notice)))
}
