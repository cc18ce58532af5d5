use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error};
use wasm_bindgen::prelude::*;

use super::error::{SurfaceError, describe};

struct Inner {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
	pending: Cell<Option<i32>>,
	stopped: Cell<bool>,
}

impl Inner {
	fn request(&self) -> Result<(), SurfaceError> {
		if self.stopped.get() || self.pending.get().is_some() {
			return Ok(());
		}
		let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return Ok(());
		};
		let id = window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map_err(|e| SurfaceError::AnimationFrame(describe(&e)))?;
		self.pending.set(Some(id));
		Ok(())
	}
}

/// Drives a per-frame callback through `requestAnimationFrame`.
///
/// The callback returns whether another frame is wanted; once it returns
/// `false` the loop idles until [`FrameLoop::wake`]. Dropping the loop stops it.
pub struct FrameLoop {
	inner: Rc<Inner>,
}

impl FrameLoop {
	pub fn new(mut frame: impl FnMut() -> bool + 'static) -> Self {
		let inner = Rc::new(Inner {
			callback: RefCell::new(None),
			pending: Cell::new(None),
			stopped: Cell::new(false),
		});
		let weak: Weak<Inner> = Rc::downgrade(&inner);
		*inner.callback.borrow_mut() = Some(Closure::new(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.pending.set(None);
			if inner.stopped.get() {
				return;
			}
			if frame()
				&& let Err(err) = inner.request()
			{
				error!("keyword graph frame loop halted: {err}");
			}
		}));
		Self { inner }
	}

	/// Schedules a frame unless one is already pending.
	pub fn wake(&self) -> Result<(), SurfaceError> {
		self.inner.request()
	}

	/// Cancels any pending frame and releases the callback. Idempotent.
	pub fn stop(&self) {
		if self.inner.stopped.replace(true) {
			return;
		}
		if let Some(id) = self.inner.pending.take()
			&& let Some(window) = web_sys::window()
		{
			let _ = window.cancel_animation_frame(id);
		}
		self.inner.callback.borrow_mut().take();
		debug!("keyword graph frame loop stopped");
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}
