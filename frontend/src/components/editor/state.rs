//! Runtime state of the band editor.
//!
//! The editor keeps the page as last loaded or echoed by the store (`page`), plus a
//! [`PageReorder`] holding one sync per sortable list: the bands of the page and the
//! slides of every slideshow band. Lists are always displayed in their sync's visible
//! order, and only one of them has a reorder in flight at a time.

use std::collections::HashMap;

use common::model::{Band, ImageRef, Page};
use common::reorder::{PageReorder, ReorderSync};
use common::upload::{UploadSlot, UploadStatus};
use yew::prelude::*;

use super::api::UploadHandle;
use crate::components::carousel::CarouselController;

/// A sortable list the editor submits reorders for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortList {
    Bands,
    Slides { band_id: String },
}

/// The item being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub list: SortList,
    pub id: String,
}

/// An upload that has been sent and not yet resolved.
pub struct UploadEntry {
    pub status: UploadStatus,
    /// Image shown before the upload started, restored when it fails.
    pub previous: ImageRef,
    pub handle: Option<UploadHandle>,
}

pub struct BandEditor {
    pub page_id: String,
    pub page: Page,
    /// Guard for the one-time initial load.
    pub loaded: bool,
    pub reorders: PageReorder<SortList>,
    pub dragging: Option<DragItem>,
    pub selected_band: Option<String>,
    pub uploads: HashMap<UploadSlot, UploadEntry>,
    /// Slot waiting for the hidden file input to report a file.
    pub upload_target: Option<UploadSlot>,
    /// MD5 of each band's JSON at its last load or save. Used for dirty tracking.
    pub saved_md5: HashMap<String, String>,
    pub file_input_ref: NodeRef,
    pub new_band_dialog_ref: NodeRef,
    pub preview_ref: NodeRef,
    /// Markup the current controllers are attached to.
    pub attached_markup: String,
    pub controllers: Vec<CarouselController>,
}

impl BandEditor {
    pub fn new(page_id: String) -> Self {
        Self {
            page: Page::new(page_id.clone()),
            page_id,
            loaded: false,
            reorders: PageReorder::default(),
            dragging: None,
            selected_band: None,
            uploads: HashMap::new(),
            upload_target: None,
            saved_md5: HashMap::new(),
            file_input_ref: NodeRef::default(),
            new_band_dialog_ref: NodeRef::default(),
            preview_ref: NodeRef::default(),
            attached_markup: String::new(),
            controllers: Vec::new(),
        }
    }

    pub fn sync(&self, list: &SortList) -> Option<&ReorderSync> {
        self.reorders.sync(list)
    }

    /// Whether a reorder, a create or a delete is waiting for the store. Rows are not
    /// draggable meanwhile.
    pub fn reorder_busy(&self) -> bool {
        self.reorders.is_busy()
    }

    /// Bands in the order currently shown to the user.
    pub fn visible_bands(&self) -> Vec<&Band> {
        self.sync(&SortList::Bands)
            .map(ReorderSync::visible)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.page.band(id))
            .collect()
    }

    /// Bands in visible order with each slideshow's slides in their visible order, as
    /// rendered by the preview.
    pub fn preview_bands(&self) -> Vec<Band> {
        self.visible_bands()
            .into_iter()
            .map(|band| {
                let mut band = band.clone();
                let list = SortList::Slides {
                    band_id: band.id.clone(),
                };
                if let Some(sync) = self.sync(&list) {
                    let _ = band.reorder_slides(sync.visible());
                }
                band
            })
            .collect()
    }

    /// Rebuilds every sync from the page after a load or a membership change. Deferred
    /// while a reorder is in flight; the editor retries once it resolves.
    pub fn reset_syncs(&mut self) {
        let slide_lists = self
            .page
            .bands()
            .iter()
            .filter(|band| band.slideshow().is_some())
            .map(|band| {
                let list = SortList::Slides {
                    band_id: band.id.clone(),
                };
                (list, band.slide_ordering())
            });
        let lists: Vec<_> = std::iter::once((SortList::Bands, self.page.ordering()))
            .chain(slide_lists)
            .collect();
        self.reorders.rebuild(lists);
    }
}
