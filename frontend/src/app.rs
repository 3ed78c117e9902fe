use crate::components::editor::BandEditor;
use yew::{html, AttrValue, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub page_id: AttrValue,
}

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = AppProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="app-root">
                <BandEditor page_id={ctx.props().page_id.clone()} />
            </div>
        }
    }
}
