//! `SeaORM` entities for the task store.

pub mod category;
pub mod task;
