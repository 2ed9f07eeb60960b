pub mod topic;
pub use topic::{ArticleIndex, ArticlePlan, Stage3Entry, Stage4Data, Topic, ARTICLE_COUNT};
