//! Wasm entry point.
//!
//! On the editor page (`#band-editor`) the Yew editor is mounted for the page named
//! by `data-page-id`, or by the `?page=` query parameter when present. On public
//! pages only the slideshow controllers are attached to the server-rendered bands.

use std::cell::RefCell;

use crate::app::{App, AppProps};
use crate::components::carousel::CarouselController;

mod app;
mod components;
mod tops_sheet;

const EDITOR_ROOT_ID: &str = "band-editor";
const DEFAULT_PAGE_ID: &str = "home";

thread_local! {
    static PAGE_CAROUSELS: RefCell<Vec<CarouselController>> = const { RefCell::new(Vec::new()) };
}

fn query_page_id(window: &web_sys::Window) -> Option<String> {
    let search = window.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("page").filter(|page| !page.trim().is_empty())
}

fn main() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if let Some(root) = document.get_element_by_id(EDITOR_ROOT_ID) {
        let page_id = query_page_id(&window)
            .or_else(|| root.get_attribute("data-page-id"))
            .unwrap_or_else(|| DEFAULT_PAGE_ID.to_string());
        yew::Renderer::<App>::with_root_and_props(
            root,
            AppProps {
                page_id: page_id.into(),
            },
        )
        .render();
    } else if let Some(body) = document.body() {
        let controllers = CarouselController::attach_all(&body);
        PAGE_CAROUSELS.with(|carousels| *carousels.borrow_mut() = controllers);
    }
}
