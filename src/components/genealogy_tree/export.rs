use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, HtmlAnchorElement, HtmlCanvasElement, Url};

use crate::genealogy::{GenealogyError, MythologyFilter, Result};

pub fn export_file_name(filter: &MythologyFilter) -> String {
	let slug: String = filter
		.to_string()
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
		.collect();
	format!("genealogy-{}.png", slug)
}

fn js_error(context: &str, err: JsValue) -> GenealogyError {
	GenealogyError::Export(format!("{}: {:?}", context, err))
}

type Done = Rc<RefCell<Option<Box<dyn FnOnce(Result<()>)>>>>;

fn finish(done: &Done, result: Result<()>) {
	if let Err(err) = &result {
		error!("{}", err);
	}
	if let Some(on_done) = done.borrow_mut().take() {
		on_done(result);
	}
}

/// Serializes the canvas to PNG off the interaction path and hands it to the
/// browser as a download. `on_done` runs exactly once.
pub fn export_png(
	canvas: &HtmlCanvasElement,
	file_name: String,
	on_done: impl FnOnce(Result<()>) + 'static,
) {
	let done: Done = Rc::new(RefCell::new(Some(Box::new(on_done))));
	let done_cb = done.clone();
	let callback = Closure::once_into_js(move |value: JsValue| {
		let result = value
			.dyn_into::<Blob>()
			.map_err(|_| GenealogyError::Export("canvas produced no image".into()))
			.and_then(|blob| download(&blob, &file_name));
		if result.is_ok() {
			info!("Exported {}", file_name);
		}
		finish(&done_cb, result);
	});
	if let Err(err) = canvas.to_blob(callback.unchecked_ref()) {
		finish(&done, Err(js_error("toBlob", err)));
	}
}

fn download(blob: &Blob, file_name: &str) -> Result<()> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| GenealogyError::Export("no document".into()))?;
	let url = Url::create_object_url_with_blob(blob).map_err(|e| js_error("createObjectURL", e))?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(|e| js_error("createElement", e))?
		.dyn_into()
		.map_err(|_| GenealogyError::Export("anchor element unavailable".into()))?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url).map_err(|e| js_error("revokeObjectURL", e))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_export_file_name() {
		assert_eq!(export_file_name(&MythologyFilter::All), "genealogy-all.png");
		assert_eq!(
			export_file_name(&MythologyFilter::Only("Ancient Egyptian".into())),
			"genealogy-ancient-egyptian.png"
		);
	}
}
