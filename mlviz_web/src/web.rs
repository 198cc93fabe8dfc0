use leptos::prelude::*;
use mlviz::routes::Route;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::ui_model::{document_title, nav_items, status_line, ChartKind};

mod canvas;
mod console_log;
mod markdown;
mod pages;
mod scheduler;

use pages::{
    ApplesOrangesPage, ChartPage, HomePage, NeuralNetworksPage, NeuronsPage, RouteLink,
    TransformersPage,
};

pub fn start() {
    console_log::init();
    mount_to_body(|| view! { <App /> });
}

/// Current page plus the shared status line.
#[derive(Debug, Clone, Copy)]
pub(super) struct Navigator {
    route: RwSignal<Route>,
    status: RwSignal<String>,
}

impl Navigator {
    /// Navigate in-app and record the new path in history.
    pub(super) fn go(self, to: Route) {
        if self.route.get_untracked() == to {
            return;
        }
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if history
                .push_state_with_url(&JsValue::NULL, "", Some(to.path()))
                .is_err()
            {
                warn!(path = to.path(), "pushState threw");
            }
        }
        self.show(to);
    }

    fn show(self, route: Route) {
        self.status.set(String::new());
        self.route.set(route);
        info!(%route, "navigate");
    }

    /// Follow the address bar (back/forward buttons).
    fn sync_from_location(self) {
        self.status.set(String::new());
        let route = route_from_location(self.status);
        if self.route.get_untracked() != route {
            self.route.set(route);
        }
    }
}

fn location_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

/// Route for the current URL; unknown paths fall back to home with a status message.
fn route_from_location(status: RwSignal<String>) -> Route {
    let path = location_path().unwrap_or_else(|| "/".to_string());
    match Route::from_path(&path) {
        Ok(route) => route,
        Err(e) => {
            warn!(%path, "unknown route");
            status.set(status_line(&e));
            Route::Home
        }
    }
}

fn page(route: Route) -> AnyView {
    match route {
        Route::Home => view! { <HomePage /> }.into_any(),
        Route::LinearRegression => view! { <ChartPage kind=ChartKind::Linear /> }.into_any(),
        Route::LogisticRegression => view! { <ChartPage kind=ChartKind::Logistic /> }.into_any(),
        Route::NeuralNetworks => view! { <NeuralNetworksPage /> }.into_any(),
        Route::ApplesOranges => view! { <ApplesOrangesPage /> }.into_any(),
        Route::Neurons => view! { <NeuronsPage /> }.into_any(),
        Route::Transformers => view! { <TransformersPage /> }.into_any(),
    }
}

#[component]
fn App() -> impl IntoView {
    let status = RwSignal::new(String::new());
    let route = RwSignal::new(route_from_location(status));
    let nav = Navigator { route, status };
    provide_context(nav);

    let _popstate = window_event_listener(leptos::ev::popstate, move |_| nav.sync_from_location());

    Effect::new(move |_| {
        let title = document_title(route.get());
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(&title);
        }
    });

    let nav_bar = move || {
        nav_items(route.get())
            .into_iter()
            .map(|item| {
                view! { <RouteLink to=item.route active=item.active>{item.label}</RouteLink> }
            })
            .collect_view()
    };

    view! {
        <div style="font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 16px;">
            <nav style="display: flex; gap: 16px; padding-bottom: 10px; border-bottom: 1px solid #eee;">
                {nav_bar}
            </nav>
            <p style="color: #b91c1c; font-size: 13px; min-height: 1em;">{move || status.get()}</p>
            <main>{move || page(route.get())}</main>
        </div>
    }
}
