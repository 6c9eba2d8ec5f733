pub mod frequency;
pub mod location;
pub mod parameter;
pub mod period;
pub mod value_kind;
