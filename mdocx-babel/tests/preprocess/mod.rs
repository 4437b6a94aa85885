//! Preprocessing tests: macro blocks, tokens and commands working together.

mod pipeline;
mod properties;
