//! Trait seams between the import pipeline and the remote crawling service.

pub mod crawler;
