pub mod dialog;
pub mod dictionary;
pub mod download;
pub mod encoding;
pub mod export;
