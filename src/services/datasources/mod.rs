//! Data source management: packaging uploads and dispatching them.

mod packager;
mod service;

pub use packager::{
    DataSourceInput, DataSourcePackager, DataSourcePayload, FileAttachment, ALLOWED_EXTENSIONS,
    URL_SOURCE_TYPE,
};
pub use service::DataSourcesService;
