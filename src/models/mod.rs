pub mod catalog;
pub mod post;
