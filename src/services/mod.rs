pub mod assistant_service;
pub mod model_service;
pub mod prompt_builder;
pub mod reply_parsers;
pub mod response_interpreter;
pub mod speech_service;
pub mod stage4_draft;
pub mod topic_service;
pub mod workspace;

pub use assistant_service::AssistantService;
pub use speech_service::SpeechService;
pub use topic_service::TopicService;
