pub mod answer;
pub mod evaluator;
pub mod navigation;
pub mod session;
pub mod summary;
pub mod timer;
pub mod typing;
pub mod view;

pub use answer::{SelectedWord, VersionAnswer, VersionId, VersionStatus};
pub use session::{InOrder, QuestionSnapshot, QuizSession, Shuffled, SlotOrder};
pub use typing::{InputContext, KeyInput, KeyOutcome, KeyboardDriver, MatchTier};
pub use view::Phase;
