mod answer;
mod ids;
mod ingest;
mod prize;
mod progress;
mod question;
mod section;

pub use answer::{Answer, ParseTruthError, SectionAnswers, TruthAnswer};
pub use ids::{OptionId, ParseIdError, QuestionId, SectionId, StatementId};
pub use ingest::{IngestError, RawMultipleChoice, RawQuestions, RawTrueFalse};
pub use prize::{Prize, PrizeError, PrizeWheel, SpinOutcome};
pub use progress::{
    OverallProgress, ProgressError, ScoreApplication, SectionProgress, SyncReport,
};
pub use question::{ChoiceOption, MultipleChoiceQuestion, SectionQuestions, TrueFalseSet};
pub use section::{SectionCatalog, SectionCatalogError, SectionDef, SectionKind};
