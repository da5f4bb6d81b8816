pub mod thumbnail_get;
pub mod thumbnail_upload;
pub mod video_upload;

pub use thumbnail_get::get_thumbnail;
pub use thumbnail_upload::upload_thumbnail;
pub use video_upload::upload_video;
