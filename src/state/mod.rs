pub mod document;
pub mod persistence;

pub use document::{cell_key, decode, encode, CellRecord, Document};
pub use persistence::{load_buffer, load_document, save_buffer, save_document};
