//! Topic location domain module

mod timestamp;
mod topic_prompt;
mod video_id;

pub use timestamp::Timestamp;
pub use topic_prompt::TopicPrompt;
pub use video_id::VideoId;
