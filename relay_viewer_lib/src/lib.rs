pub mod color;
pub mod distance;
pub mod feature_collection;
pub mod selection;
pub mod settings;
pub mod stats;
pub mod track;
