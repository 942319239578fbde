pub mod generator;

pub use generator::{
    synthetic_header, DEFAULT_HEADER_LEN, DEFAULT_HEADER_NAME, HEADER_ALPHABET,
};
