use common::model::BandKind;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::editor::helpers::kind_label;
use crate::components::editor::{BandEditor, Msg};
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

fn kind_icon(kind: BandKind) -> &'static str {
    match kind {
        BandKind::Slideshow => "view_carousel",
        BandKind::Product => "storefront",
        BandKind::Generic => "code",
    }
}

/// Kind picker shown by the "Nueva banda" button.
pub fn new_band_dialog(editor: &BandEditor, link: &Scope<BandEditor>) -> Html {
    let options = BandKind::ALL.iter().map(|kind| {
        let kind = *kind;
        html! {
            <button class="band-kind-option" onclick={link.callback(move |_| Msg::CreateBand(kind))}>
                <i class="material-icons">{ kind_icon(kind) }</i>
                <span>{ kind_label(kind) }</span>
            </button>
        }
    });

    html! {
        <YwMaterialTopSheet
            node_ref={editor.new_band_dialog_ref.clone()}
            title={Some("Nueva banda".to_string())}
            on_close={Some(link.callback(|_| Msg::CloseNewBandDialog))}
        >
            <div class="band-kind-options">
                { for options }
            </div>
        </YwMaterialTopSheet>
    }
}
