use common::model::{Band, BandKind, Slide};
use common::upload::{UploadSlot, UploadStatus};
use common::BandError;

use super::state::{DragItem, SortList};

/// Editable band fields, each edited through a text value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandField {
    HeightClass,
    BackgroundColor,
    TextColor,
    Autoplay,
    IntervalMs,
    ProductTitle,
    ProductDescription,
    ProductCta,
    ProductLink,
    ProductImageAlt,
    GenericHtml,
}

/// Editable slide fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideField {
    Alt,
    Title,
    Subtitle,
    Link,
    SeoTitle,
    SeoDescription,
}

pub enum Msg {
    PageLoaded(Vec<Band>),
    RequestFailed(String, BandError),
    /// A create or delete request failed; the editor stops waiting for it.
    MembershipFailed(String, BandError),

    OpenNewBandDialog,
    CloseNewBandDialog,
    CreateBand(BandKind),
    BandCreated(Band),
    DeleteBand(String),
    BandDeleted(String),
    SelectBand(Option<String>),
    EditBand {
        band_id: String,
        field: BandField,
        value: String,
    },
    SaveBand(String),
    BandSaved(Band),

    AddSlide(String),
    SlideCreated(Slide),
    DeleteSlide {
        band_id: String,
        slide_id: String,
    },
    SlideDeleted {
        band_id: String,
        slide_id: String,
    },
    EditSlide {
        band_id: String,
        slide_id: String,
        field: SlideField,
        value: String,
    },

    DragStart(DragItem),
    DropOn {
        list: SortList,
        target_index: usize,
    },
    DragEnd,
    ReorderResolved {
        list: SortList,
        outcome: Result<(), BandError>,
    },

    PickImage(UploadSlot),
    FileChosen(web_sys::File),
    UploadProgress {
        slot: UploadSlot,
        status: UploadStatus,
    },
    UploadFinished {
        slot: UploadSlot,
        result: Result<String, BandError>,
    },
}
