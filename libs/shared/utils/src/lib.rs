pub mod extractor;
pub mod images;
pub mod jwt;
pub mod password;
pub mod validation;

pub mod test_utils;
