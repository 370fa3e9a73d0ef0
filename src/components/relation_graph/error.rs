use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the browser boundary. The simulation itself never fails.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("no global `window` available")]
	NoWindow,
	#[error("canvas has no 2d rendering context")]
	NoContext,
	#[error("javascript call failed: {0}")]
	Js(String),
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		GraphError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
