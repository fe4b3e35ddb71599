//! Download dispatch: the extraction backend and the checks around it.

pub mod error;
pub mod mode;
pub mod pipeline;
pub mod source;
pub mod ytdlp;

pub use error::DownloadError;
pub use mode::DownloadMode;
pub use pipeline::{prepare_delivery, remove_scratch_file, Delivery};
pub use source::{DownloadedMedia, MediaExtractor};
pub use ytdlp::YtDlpExtractor;
