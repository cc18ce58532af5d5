//! Leptos client-side app wiring and routes for the keyword graph views.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod components;
mod pages;
pub mod store;

use crate::pages::cluster::ClusterPage;
use crate::pages::home::Home;
use crate::pages::keyword::KeywordPage;
use crate::pages::map::KnowledgeMapPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Routes for today's keywords, keyword and cluster detail graphs, and the knowledge map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="ko" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Keyword Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/keywords/:id") view=KeywordPage />
				<Route path=path!("/clusters/:id") view=ClusterPage />
				<Route path=path!("/map") view=KnowledgeMapPage />
			</Routes>
		</Router>
	}
}
