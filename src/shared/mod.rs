pub mod locale;
pub mod text;
