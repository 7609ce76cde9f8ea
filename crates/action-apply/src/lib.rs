pub mod dispatch;
pub mod ports;

pub use dispatch::{apply, ApplyDeps};
pub use ports::InsertPosition;
