pub mod animation;
pub mod dsl;
pub mod entity;
pub mod mainline;
pub mod pose;
pub mod timeline;
