//! Runtime side of the slideshow: attaches the pure state machine from
//! `common::carousel` to server-rendered markup.

mod controller;

pub use controller::CarouselController;
