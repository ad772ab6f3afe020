mod post;
mod sentiment;

pub use post::{Post, ScoredPost};
pub use sentiment::Sentiment;
