use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::error::{SurfaceError, describe};
use super::frame_loop::FrameLoop;
use super::layout::LayoutConfig;
use super::render;
use super::state::GraphViewState;
use super::types::{GraphInput, NavTarget};

type SharedState = Rc<RefCell<Option<GraphViewState>>>;
type SharedFrames = Rc<RefCell<Option<FrameLoop>>>;

/// Force-directed keyword graph drawn on a canvas.
///
/// The graph and its simulation are rebuilt from scratch whenever `data`
/// changes; the previous frame loop is stopped first. Clicking a node or a
/// cluster edge calls `on_select`.
#[component]
pub fn KeywordGraphCanvas(
	#[prop(into)] data: Signal<GraphInput>,
	#[prop(into)] on_select: UnsyncCallback<NavTarget>,
	#[prop(optional)] on_error: Option<UnsyncCallback<SurfaceError>>,
	#[prop(default = LayoutConfig::default())] layout: LayoutConfig,
	#[prop(optional)] width: Option<f64>,
	#[prop(optional)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let frames: SharedFrames = Rc::new(RefCell::new(None));
	let surface_error = RwSignal::new(None::<String>);
	let (state_init, frames_init) = (state.clone(), frames.clone());

	Effect::new(move |_| {
		let input = data.get();
		stop_frames(&frames_init);

		let started = canvas_ref
			.get()
			.ok_or(SurfaceError::CanvasMissing)
			.and_then(|canvas| {
				start(canvas.into(), &input, layout.clone(), width, height, &state_init)
			});
		match install(started, &state_init, &frames_init) {
			Ok(()) => surface_error.set(None),
			Err(err) => {
				error!("keyword graph unavailable: {err}");
				surface_error.set(Some(err.to_string()));
				if let Some(on_error) = &on_error {
					on_error.run(err);
				}
			}
		}
	});

	let teardown = StoredValue::new_local(frames.clone());
	on_cleanup(move || {
		let _ = teardown.try_with_value(stop_frames);
	});

	let (state_md, frames_md) = (state.clone(), frames.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
		wake(&frames_md);
	};

	let (state_mm, frames_mm) = (state.clone(), frames.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
		wake(&frames_mm);
	};

	let (state_mu, frames_mu) = (state.clone(), frames.clone());
	let on_mouseup = move |_: MouseEvent| {
		let target = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up());
		wake(&frames_mu);
		if let Some(target) = target {
			debug!("keyword graph selected {target:?}");
			on_select.run(target);
		}
	};

	let (state_ml, frames_ml) = (state.clone(), frames.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
		wake(&frames_ml);
	};

	let (state_wh, frames_wh) = (state.clone(), frames.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
		wake(&frames_wh);
	};

	view! {
		{move || {
			surface_error
				.get()
				.map(|msg| view! { <p class="keyword-graph-error">{msg}</p> })
		}}
		<canvas
			node_ref=canvas_ref
			class="keyword-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn stop_frames(frames: &SharedFrames) {
	if let Some(frame_loop) = frames.borrow_mut().take() {
		frame_loop.stop();
	}
}

/// Keeps a started loop, or drops the graph a failed rebuild left behind so
/// the pointer handlers have nothing stale to act on.
fn install(
	started: Result<FrameLoop, SurfaceError>,
	state: &SharedState,
	frames: &SharedFrames,
) -> Result<(), SurfaceError> {
	match started {
		Ok(frame_loop) => {
			*frames.borrow_mut() = Some(frame_loop);
			Ok(())
		}
		Err(err) => {
			state.borrow_mut().take();
			Err(err)
		}
	}
}

fn wake(frames: &SharedFrames) {
	if let Some(frame_loop) = frames.borrow().as_ref()
		&& let Err(err) = frame_loop.wake()
	{
		error!("keyword graph could not schedule a frame: {err}");
	}
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn surface_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(700.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(500.0)
		}),
	)
}

/// Builds a fresh graph for `input` and starts its frame loop.
fn start(
	canvas: HtmlCanvasElement,
	input: &GraphInput,
	layout: LayoutConfig,
	width: Option<f64>,
	height: Option<f64>,
	state: &SharedState,
) -> Result<FrameLoop, SurfaceError> {
	let (w, h) = surface_size(&canvas, width, height);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| SurfaceError::ContextUnavailable(describe(&e)))?
		.ok_or_else(|| SurfaceError::ContextUnavailable("no 2d context".into()))?
		.dyn_into()
		.map_err(|e| SurfaceError::ContextUnavailable(describe(&e)))?;

	*state.borrow_mut() = Some(GraphViewState::new(input, layout, w, h));

	let state_frame = state.clone();
	let frame_loop = FrameLoop::new(move || {
		let mut guard = state_frame.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return false;
		};
		let moving = s.tick();
		render::render(s, &ctx);
		moving || s.is_dragging()
	});
	frame_loop.wake()?;
	Ok(frame_loop)
}
