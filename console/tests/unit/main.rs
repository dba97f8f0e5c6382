//! Integration tests for the console library

mod test_builder;
mod test_codec;
mod test_screens;
