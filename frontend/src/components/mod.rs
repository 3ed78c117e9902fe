pub mod carousel;
pub mod editor;
