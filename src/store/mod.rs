//! Storage layer for drawings and the configuration module

mod config_module;
mod drawing_store;

pub use config_module::ConfigModule;
pub use drawing_store::{
    decode_base64, validate_drawing_name, validate_filename, validate_save_name, DrawingStore,
};
