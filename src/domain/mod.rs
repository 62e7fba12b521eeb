pub mod category;
pub mod model;
