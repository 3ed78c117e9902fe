//! Properties of the band editor.

use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct BandEditorProps {
    /// Page whose bands are edited. Loaded once, on the first render.
    pub page_id: AttrValue,
}
