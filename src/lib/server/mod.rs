pub mod manager;
pub mod pages;
