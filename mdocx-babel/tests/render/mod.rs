//! Rendering tests: the whole pipeline up to the document model.

mod kitchensink;
mod properties;
