//! Integration test modules for cropper

pub mod delivery;
pub mod editing;
pub mod export;
pub mod loading;
pub mod rendering;
