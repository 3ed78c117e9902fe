//! Band editor: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic, view rendering, and helpers.
//!
//! On first render the page's bands are loaded from the store. After every render
//! the slideshow controllers are re-attached if the preview markup changed, so the
//! preview behaves like the public page.

use yew::platform::spawn_local;
use yew::prelude::*;

mod api;
mod dialogs;
mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::components::carousel::CarouselController;
pub use messages::Msg;
pub use props::BandEditorProps;
pub use state::BandEditor;

impl Component for BandEditor {
    type Message = Msg;
    type Properties = BandEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        BandEditor::new(ctx.props().page_id.to_string())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let link = ctx.link().clone();
            let page_id = self.page_id.clone();
            spawn_local(async move {
                match api::load_page(&page_id).await {
                    Ok(bands) => link.send_message(Msg::PageLoaded(bands)),
                    Err(err) => link.send_message(Msg::RequestFailed(
                        "Error cargando la página".to_string(),
                        err,
                    )),
                }
            });
        }

        let markup = view::preview_markup(self);
        if markup != self.attached_markup {
            self.controllers.clear();
            if let Some(preview) = self.preview_ref.cast::<web_sys::Element>() {
                self.controllers = CarouselController::attach_all(&preview);
            }
            self.attached_markup = markup;
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.controllers.clear();
    }
}
