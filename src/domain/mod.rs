pub mod error;
pub mod photo;
pub mod project;
pub mod report;
pub mod response;
