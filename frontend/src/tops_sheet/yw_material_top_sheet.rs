//! Sliding sheet anchored to the top of the viewport, used for the editor's dialogs.
//!
//! The sheet is shown by toggling the `show` class. The toggle is delayed slightly so
//! a sheet rendered in the same tick still gets its entry transition.

use gloo_timers::callback::Timeout;
use uuid::Uuid;
use yew::{html, Callback, Component, Context, Html, NodeRef, Properties};

const SHOW_CLASS: &str = "show";
const TOGGLE_DELAY_MS: u32 = 50;

pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    #[prop_or_default]
    pub title: Option<String>,
    /// Fired by the close button in the header.
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let header = props.title.as_ref().map(|title| {
            let close = props.on_close.clone().map(|on_close| {
                html! {
                    <button class="top-sheet-close" title="Cerrar"
                        onclick={move |_| on_close.emit(())}>
                        <i class="material-icons">{"close"}</i>
                    </button>
                }
            });
            html! {
                <div class="top-sheet-header">
                    <h3>{ title.clone() }</h3>
                    { for close }
                </div>
            }
        });

        html! {
            <div class="top-sheet" id={self.id.clone()} ref={props.node_ref.clone()}>
                { for header }
                <div class="top-sheet-body">
                    { props.children.clone() }
                </div>
            </div>
        }
    }
}

fn toggle_later(top_sheet_ref: NodeRef, show: bool) {
    Timeout::new(TOGGLE_DELAY_MS, move || {
        if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::Element>() {
            let classes = top_sheet.class_list();
            let _ = if show {
                classes.add_1(SHOW_CLASS)
            } else {
                classes.remove_1(SHOW_CLASS)
            };
        }
    })
    .forget();
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle_later(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle_later(top_sheet_ref, false);
}
