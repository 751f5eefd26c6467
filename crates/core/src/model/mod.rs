mod entity;
mod ids;
mod question;
mod session;
mod settings;

pub use entity::{Area, EntityError, EntityKind, LocationEntity, SQ_KM_PER_SQ_MILE};
pub use ids::{EntityId, ParseIdError};
pub use question::{AttributeKind, QuestionError, QuestionSet, QuestionSpec, Side};
pub use session::{AnswerRecord, Outcome, SessionSummary, SessionSummaryError};
pub use settings::{
    AdvanceMode, DEFAULT_DELAY_SECONDS, SessionSettings, SessionSettingsDraft, SettingsError,
    UnitSystem,
};
