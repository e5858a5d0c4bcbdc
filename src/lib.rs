pub mod config;
pub mod error;
pub mod formats;
pub mod ifd;
pub mod iptc;
pub mod irb;
pub mod metadata;
pub mod nikon_lens;
pub mod primitive;
pub mod processor;
pub mod segments;
pub mod source;
pub mod store;
pub mod tags;
pub mod walker;
pub mod xmp;

pub use error::{AppError, DecodeError};
pub use metadata::ImageMetadata;
pub use store::MetadataStore;
