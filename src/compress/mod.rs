//! LZ5 streaming compression engine.
//!
//! Layering, leaves first: [`types`] (level table) and [`hash`] →
//! [`window`] (logical addressing) → [`search`] (tables and match finding)
//! → [`context`] (session lifecycle) → [`encode`] (wire formats) →
//! [`dispatch`] (one block) → [`api`].

pub mod api;
pub mod context;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod hash;
pub mod search;
pub mod types;
pub mod window;

pub use api::{
    compress, compress_bound, compress_continue, compress_ext_state, compress_ext_state_level1,
    compress_level1, create_stream, create_stream_level1, free_stream, load_dictionary,
    reset_stream, reset_stream_level1, save_dictionary, size_of_state, size_of_state_level1,
    Lz5Stream,
};
pub use error::Lz5Error;
pub use types::{LZ5_DEFAULT_CLEVEL, LZ5_MAX_CLEVEL, LZ5_MIN_CLEVEL, MAX_WINDOW, TRANSFORM_LEVEL};
