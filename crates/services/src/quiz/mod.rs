mod bank;
mod loader;
mod session;
mod source;

pub use bank::builtin_source;
pub use loader::{QuestionLoad, QuestionLoader};
pub use session::QuizSession;
pub use source::{HttpQuestionSource, QuestionSource, StaticQuestionSource};
