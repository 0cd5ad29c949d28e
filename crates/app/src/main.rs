use dioxus::prelude::*;
use shared_types::FeatureFlags;

mod auth;
mod format_helpers;
mod routes;
use auth::AuthState;
use routes::Route;

const THEME_BASE: Asset = asset!("/assets/theme-base.css");
const THEME_LIGHT: Asset = asset!("/assets/themes/light.css");
const THEME_DARK: Asset = asset!("/assets/themes/dark.css");
const PAGES: Asset = asset!("/assets/pages.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        let config = server::config::load_config();

        if config.features.telemetry {
            server::telemetry::init_telemetry();
        }
        server::health::record_start_time();

        let pool = server::db::create_pool(config)?;
        server::db::run_migrations(&pool).await?;
        server::service::report::recover_interrupted(&pool).await?;

        if config.seed.sample_data {
            server::seed::seed_if_empty(&pool, config).await?;
        }

        let state = server::db::AppState::new(pool, config.clone());
        server::db::install_state(state.clone());

        let mut router =
            dioxus::server::router(App).merge(server::openapi::api_router(state.clone()));

        if config.features.telemetry {
            router = router.layer(server::telemetry::OtelTraceLayer);
        }

        let router = router
            .layer(axum::middleware::from_fn_with_state(
                state,
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Feature flags are fetched once; defaults (all off) on error.
    let flags_resource =
        use_server_future(move || async move { server::api::get_feature_flags().await })?;

    let flags = flags_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(FeatureFlags::default()))
        .unwrap_or_default();

    use_context_provider(|| flags);
    use_context_provider(AuthState::new);
    use_context_provider(|| shared_ui::theme::ThemeState {
        theme: Signal::new(shared_ui::theme::Theme::default()),
    });

    rsx! {
        document::Title { "StaffDesk" }
        document::Link { rel: "stylesheet", href: THEME_BASE }
        document::Link { rel: "stylesheet", href: THEME_LIGHT }
        document::Link { rel: "stylesheet", href: THEME_DARK }
        document::Link { rel: "stylesheet", href: PAGES }
        shared_ui::theme::ThemeSeed {}
        shared_ui::ToastProvider {
            SuspenseBoundary {
                fallback: |_| rsx! {
                    div { class: "auth-guard-loading",
                        p { "Loading..." }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
