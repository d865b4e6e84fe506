//! HTTP protocol layer module
//!
//! Content types, validators, ranges and response builders used by the
//! file dispatcher. Nothing here touches the filesystem.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use mime::MimeTable;
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_301_response, build_403_response, build_404_response, build_405_response,
    build_416_response, build_options_response, FileMeta,
};
