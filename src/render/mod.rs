//! Rendering of logical tables into the table record and its JSON form.

mod bioc;
mod json;

pub use bioc::{to_document, to_record};
pub use json::{from_json, to_json, JsonFormat};
