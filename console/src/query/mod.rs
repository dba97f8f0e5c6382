//! Device filter queries: model, codec, editors and rendering

pub mod builder;
pub mod codec;
pub mod matching;
pub mod model;
pub mod render;
pub mod update;
pub mod validate;

pub use builder::{ConditionEdit, FilterEditor, QueryEditor};
pub use codec::DeviceListState;
pub use model::{Condition, ConditionKind, Filter, Operator, Query, SelectableKinds};
