pub mod history;
pub mod resume;
pub mod subscription;
