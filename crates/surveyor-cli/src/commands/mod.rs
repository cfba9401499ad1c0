pub mod complete;
pub mod cycles;
pub mod evaluate;
pub mod transition;
pub mod validate;
