//! Behavior state kinds.

mod avoiding;
mod clear_map;
mod exploring;
mod find_label;
mod find_path;
mod find_unknown;
mod halt;
mod label_stuck;
mod mapping;
mod move_path;
mod move_to;

pub use avoiding::AvoidingState;
pub use clear_map::ClearMapState;
pub use exploring::ExploringState;
pub use find_label::FindLabelState;
pub use find_path::FindPathState;
pub use find_unknown::FindUnknownState;
pub use halt::HaltState;
pub use label_stuck::LabelStuckState;
pub use mapping::MappingState;
pub use move_path::MovePathState;
pub use move_to::MoveToState;
