mod files;
mod rows;

pub use files::{read_labeled, read_posts, write_prepared, write_raw, write_scored};
pub use rows::format_datetime;
#[cfg(test)]
pub use rows::parse_datetime;
