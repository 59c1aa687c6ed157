//! Domain Entities

mod fs_event;

pub use fs_event::{FsEvent, FsEventKind};
