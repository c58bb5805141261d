//! Protocol module - frame model and wire serialization.
//!
//! This module owns the data model for one logical protocol message and
//! its canonical wire representation:
//! - [`Frame`] / [`Headers`] / [`WireEvent`] entities
//! - wire byte constants and the [`marshall`] serializer

mod frame;
mod wire_format;

pub use frame::{Frame, Headers, WireEvent};
pub use wire_format::{
    marshall, serialize, CONTENT_LENGTH, LINE_FEED, NULL, OMIT_CONTENT_LENGTH,
};
