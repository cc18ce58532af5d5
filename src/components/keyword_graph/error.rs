use wasm_bindgen::JsValue;

/// The drawing surface could not be set up. Everything else the graph meets
/// (empty, malformed or dangling input) degrades without an error.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SurfaceError {
	#[error("no browser window available")]
	NoWindow,

	#[error("graph canvas is not mounted")]
	CanvasMissing,

	#[error("2d rendering context unavailable: {0}")]
	ContextUnavailable(String),

	#[error("animation frame request failed: {0}")]
	AnimationFrame(String),
}

pub(super) fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
