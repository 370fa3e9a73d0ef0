//! Browser implementations of the drawing surface, frame scheduler and
//! resize notifications.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::error::GraphError;
use super::frame_loop::{FrameId, FrameScheduler};
use super::render::{BACKGROUND, CircleStyle, Surface, TextStyle};

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")?
		.ok_or(GraphError::NoContext)?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| GraphError::NoContext)
}

/// Explicit size if given, otherwise the parent element's client size.
pub fn container_size(
	canvas: &HtmlCanvasElement,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
		self.ctx.set_fill_style_str(BACKGROUND);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn draw_line(&mut self, from: DVec2, to: DVec2, color: &str, width: f64) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn draw_circle(&mut self, center: DVec2, radius: f64, style: CircleStyle<'_>) {
		self.ctx.begin_path();
		if self
			.ctx
			.arc(center.x, center.y, radius.max(0.0), 0.0, TAU)
			.is_err()
		{
			return;
		}
		match style {
			CircleStyle::Fill(color) => {
				self.ctx.set_fill_style_str(color);
				self.ctx.fill();
			}
			CircleStyle::Stroke { color, width } => {
				self.ctx.set_stroke_style_str(color);
				self.ctx.set_line_width(width);
				self.ctx.stroke();
			}
		}
	}

	fn draw_text(&mut self, text: &str, at: DVec2, style: TextStyle<'_>) {
		self.ctx.set_fill_style_str(style.color);
		self.ctx.set_font(style.font);
		self.ctx
			.set_text_align(if style.centered { "center" } else { "left" });
		let _ = self.ctx.fill_text(text, at.x, at.y);
	}
}

/// `requestAnimationFrame` on the global window.
pub struct WindowScheduler {
	window: Window,
	closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl WindowScheduler {
	pub fn new() -> Result<Self, GraphError> {
		Ok(Self {
			window: web_sys::window().ok_or(GraphError::NoWindow)?,
			closure: RefCell::new(None),
		})
	}
}

impl FrameScheduler for WindowScheduler {
	fn request_frame(&self, callback: &Rc<dyn Fn()>) -> Result<FrameId, GraphError> {
		let mut slot = self.closure.borrow_mut();
		let closure = slot.get_or_insert_with(|| {
			let callback = Rc::clone(callback);
			Closure::new(move || callback())
		});
		Ok(self
			.window
			.request_animation_frame(closure.as_ref().unchecked_ref())?)
	}

	fn cancel_frame(&self, id: FrameId) {
		let _ = self.window.cancel_animation_frame(id);
	}
}

/// Window `resize` listener, removed again on drop.
pub struct ResizeListener {
	window: Window,
	closure: Closure<dyn FnMut()>,
}

impl ResizeListener {
	pub fn new(on_resize: impl FnMut() + 'static) -> Result<Self, GraphError> {
		let window = web_sys::window().ok_or(GraphError::NoWindow)?;
		let closure = Closure::<dyn FnMut()>::new(on_resize);
		window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
		Ok(Self { window, closure })
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
	}
}
