//! Animation-frame loop with an explicit, cancel-on-drop handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, error};

use super::error::GraphError;

pub type FrameId = i32;

/// Source of per-frame callbacks (`requestAnimationFrame` in the browser).
///
/// A loop hands the scheduler the same callback on every request.
pub trait FrameScheduler {
	fn request_frame(&self, callback: &Rc<dyn Fn()>) -> Result<FrameId, GraphError>;
	fn cancel_frame(&self, id: FrameId);
}

struct Shared<S> {
	scheduler: S,
	frame: RefCell<Box<dyn FnMut()>>,
	callback: RefCell<Option<Rc<dyn Fn()>>>,
	pending: Cell<Option<FrameId>>,
	running: Cell<bool>,
}

impl<S: FrameScheduler> Shared<S> {
	fn schedule(&self) -> Result<(), GraphError> {
		let callback = self.callback.borrow().clone();
		if let Some(callback) = callback {
			let id = self.scheduler.request_frame(&callback)?;
			self.pending.set(Some(id));
		}
		Ok(())
	}

	fn run_frame(&self) {
		self.pending.set(None);
		if !self.running.get() {
			return;
		}
		{
			let mut frame = self.frame.borrow_mut();
			(*frame)();
		}
		if let Err(err) = self.schedule() {
			error!("failed to request next animation frame: {err}");
			self.running.set(false);
		}
	}
}

/// Runs `frame` once per scheduler frame until stopped or dropped.
pub struct AnimationLoop<S: FrameScheduler + 'static> {
	shared: Option<Rc<Shared<S>>>,
}

impl<S: FrameScheduler + 'static> AnimationLoop<S> {
	pub fn start(scheduler: S, frame: impl FnMut() + 'static) -> Result<Self, GraphError> {
		let shared = Rc::new(Shared {
			scheduler,
			frame: RefCell::new(Box::new(frame)),
			callback: RefCell::new(None),
			pending: Cell::new(None),
			running: Cell::new(true),
		});
		let weak = Rc::downgrade(&shared);
		let callback: Rc<dyn Fn()> = Rc::new(move || {
			if let Some(shared) = weak.upgrade() {
				shared.run_frame();
			}
		});
		*shared.callback.borrow_mut() = Some(callback);
		shared.schedule()?;

		debug!("animation loop started");
		Ok(Self {
			shared: Some(shared),
		})
	}

	/// Cancels the pending frame. Later calls are no-ops.
	pub fn stop(&mut self) {
		let Some(shared) = self.shared.take() else {
			return;
		};
		shared.running.set(false);
		if let Some(id) = shared.pending.take() {
			shared.scheduler.cancel_frame(id);
		}
		shared.callback.borrow_mut().take();
		debug!("animation loop stopped");
	}
}

impl<S: FrameScheduler + 'static> Drop for AnimationLoop<S> {
	fn drop(&mut self) {
		self.stop();
	}
}
