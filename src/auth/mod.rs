pub mod extractor;
pub mod password;
pub mod sanitize;
pub mod token;
