mod recommend_exercise;

pub use recommend_exercise::*;
