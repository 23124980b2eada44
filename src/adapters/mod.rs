// Adapters layer: concrete implementations of the domain ports (http catalog, storage, notices).

pub mod http;
pub mod notify;
pub mod storage;

pub use http::HttpCatalog;
pub use notify::{NoticeBoard, TracingNotifier};
pub use storage::{JsonFileStorage, MemoryStorage};
