pub mod cluster;
pub mod home;
pub mod keyword;
pub mod map;
pub mod not_found;
mod sample;

use leptos::callback::UnsyncCallback;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::keyword_graph::NavTarget;

/// Routes graph clicks to the matching detail page.
fn navigate_on_select() -> UnsyncCallback<NavTarget> {
	let navigate = use_navigate();
	UnsyncCallback::new(move |target: NavTarget| {
		navigate(&target.path(), NavigateOptions::default());
	})
}
