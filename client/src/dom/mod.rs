//! Browser backend for the widget capabilities, on top of `web-sys`.

pub mod error;
pub mod media;
pub mod http;
pub mod page;
pub mod elements;
pub mod mount;

pub use elements::{RecordingDom, UploadDom};
pub use http::FetchTransport;
pub use media::{BrowserCapture, BrowserMicrophone};
pub use page::BrowserPage;
