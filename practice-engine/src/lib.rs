#![deny(clippy::string_slice)]

pub mod audio;
pub mod clock;
pub mod config;
mod grading;
pub mod item;
mod pool;
pub mod question;
pub mod random;
mod score;
pub mod session;
pub mod simulation;
pub mod store;

pub use audio::{AudioPlayback, AudioSource};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ScoringRules};
pub use grading::Grade;
pub use item::{
    ItemDetails, ItemId, ItemKey, ItemRecord, ItemType, PracticeFilters, PracticeItem,
    VerbRecord, WordRecord,
};
pub use pool::ItemPool;
pub use question::{AudioPlayLimit, Direction, Prompt, QuestionConfig, generate_config};
pub use random::{Chooser, RngChooser, ScriptedChooser};
pub use score::{LearningState, Level, Priority};
pub use session::{
    AnswerRecord, PersistFailure, PresentedQuestion, Session, SessionError, SessionEvent,
    SessionState, SessionStats, SubmitReport,
};
pub use simulation::{ConstantLearner, DailySimulation, DaySummary, Learner, SeededLearner};
pub use store::{ItemStore, MemoryStore, ScoreUpdate, StoreError};
