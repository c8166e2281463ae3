pub mod account;
pub mod brand;
pub mod guideline;
pub mod platform;
pub mod post;
