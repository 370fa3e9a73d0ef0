use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use leptos::prelude::*;
use log::error;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::canvas::{CanvasSurface, ResizeListener, WindowScheduler, container_size, context_2d};
use super::error::GraphError;
use super::frame_loop::AnimationLoop;
use super::interaction::{ContextMenu, GraphHandler, InteractionState, MenuAction};
use super::render;
use super::state::GraphState;
use super::types::{GraphVariant, Record};

/// Host callbacks; each receives a node id.
#[derive(Clone, Copy)]
struct Callbacks {
	on_node_open: Option<Callback<String>>,
	on_create_connection: Option<Callback<String>>,
	on_toggle: Option<Callback<String>>,
}

impl GraphHandler for Callbacks {
	fn node_open(&mut self, id: &str) {
		if let Some(cb) = self.on_node_open {
			cb.run(id.to_string());
		}
	}

	fn create_connection(&mut self, source_id: &str) {
		if let Some(cb) = self.on_create_connection {
			cb.run(source_id.to_string());
		}
	}

	fn toggle(&mut self, id: &str) {
		if let Some(cb) = self.on_toggle {
			cb.run(id.to_string());
		}
	}
}

type SharedState = Rc<RefCell<Option<GraphState>>>;

/// Everything torn down together when the component unmounts.
struct Mounted {
	_animation: AnimationLoop<WindowScheduler>,
	_resize: ResizeListener,
}

#[allow(clippy::too_many_arguments)]
fn mount(
	canvas: HtmlCanvasElement,
	records: &[Record],
	variant: GraphVariant,
	width: Option<f64>,
	height: Option<f64>,
	state: &SharedState,
	rng: &Rc<RefCell<SmallRng>>,
	selected: Signal<Vec<String>>,
) -> Result<Mounted, GraphError> {
	let (w, h) = container_size(&canvas, width, height);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let mut surface = CanvasSurface::new(context_2d(&canvas)?);
	*state.borrow_mut() = Some(GraphState::new(
		records,
		variant,
		w,
		h,
		&mut *rng.borrow_mut(),
	));

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	let resize = ResizeListener::new(move || {
		let (nw, nh) = container_size(&canvas_resize, width, height);
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		if let Some(ref mut s) = *state_resize.borrow_mut() {
			s.resize(nw, nh);
		}
	})?;

	let state_anim = state.clone();
	let animation = AnimationLoop::start(WindowScheduler::new()?, move || {
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			s.tick();
			let _ = selected.try_with_untracked(|ids| render::render(s, ids, &mut surface));
		}
	})?;

	Ok(Mounted {
		_animation: animation,
		_resize: resize,
	})
}

/// Force-directed graph over `records`: wiki-linked notes or community tags.
#[component]
pub fn RelationGraph(
	#[prop(into)] records: Signal<Vec<Record>>,
	variant: GraphVariant,
	#[prop(into, default = Signal::stored(Vec::new()))] selected: Signal<Vec<String>>,
	#[prop(optional)] on_node_open: Option<Callback<String>>,
	#[prop(optional)] on_create_connection: Option<Callback<String>>,
	#[prop(optional)] on_toggle: Option<Callback<String>>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let rng = Rc::new(RefCell::new(SmallRng::seed_from_u64(js_sys::Date::now() as u64)));
	let interaction = StoredValue::new_local(InteractionState::default());
	let mounted = StoredValue::new_local(None::<Mounted>);
	let (menu, set_menu) = signal(None::<ContextMenu>);
	let callbacks = Callbacks {
		on_node_open,
		on_create_connection,
		on_toggle,
	};

	on_cleanup(move || {
		let _ = mounted.try_update_value(|m| m.take());
	});

	let state_init = state.clone();
	Effect::new(move |_| {
		let records = records.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if mounted.with_value(|m| m.is_some()) {
			if let Some(ref mut s) = *state_init.borrow_mut() {
				s.rebuild(&records, &mut *rng.borrow_mut());
			}
			interaction.update_value(|i| i.dismiss());
			set_menu.set(None);
			return;
		}

		match mount(
			canvas,
			&records,
			variant,
			width,
			height,
			&state_init,
			&rng,
			selected,
		) {
			Ok(m) => mounted.set_value(Some(m)),
			Err(err) => error!("relation graph unavailable: {err}"),
		}
	});

	let local_point = move |ev: &MouseEvent| -> Option<DVec2> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some(DVec2::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(point) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			interaction.update_value(|i| i.pointer_move(s, point));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			interaction.update_value(|i| i.pointer_leave(s));
		}
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(point) = local_point(&ev) else {
			return;
		};
		let mut handler = callbacks;
		let opened = {
			let guard = state_click.borrow();
			let Some(graph) = guard.as_ref() else {
				return;
			};
			interaction.try_update_value(|i| {
				i.click(graph, point, &mut handler);
				i.menu.clone()
			})
		};
		set_menu.set(opened.flatten());
	};

	let choose = move |action: MenuAction| {
		let mut handler = callbacks;
		interaction.update_value(|i| {
			i.choose(action, &mut handler);
		});
		set_menu.set(None);
	};

	view! {
		<div class="relation-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="relation-graph-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				style="display: block; cursor: pointer;"
			/>
			{move || {
				menu.get()
					.map(|m| {
						let style = format!(
							"position: absolute; left: {}px; top: {}px;",
							m.anchor.x,
							m.anchor.y,
						);
						view! {
							<div class="graph-context-menu" style=style>
								<span class="graph-context-menu-title">{m.label}</span>
								<button on:click=move |_| choose(MenuAction::Open)>"Abrir nota"</button>
								<button on:click=move |_| {
									choose(MenuAction::CreateConnection)
								}>"Criar nota conectada"</button>
							</div>
						}
					})
			}}
		</div>
	}
}
