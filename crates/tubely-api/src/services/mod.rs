pub mod upload;

pub use upload::{authorize_owner, UploadService};
