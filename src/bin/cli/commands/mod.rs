pub mod mark;
pub mod review;
pub mod select;
pub mod stats;
