// Blog domain

pub mod models;
