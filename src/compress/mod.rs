/// Image compression module
///
/// The panel only sees `compress()`: an async call that takes the source
/// bytes plus options and yields a smaller JPEG or an error.

pub mod engine;

pub use engine::compress;
