#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod controller;
pub mod export;
pub mod ext;
pub mod filesystem;
pub mod icons;
pub mod render;
pub mod server;
pub mod session;
pub mod theme;
