// Handler modules
pub mod validate;

// Re-export all handler functions
pub use validate::{ResolvedInputs, ValidateOptions, handle_validate, process_file, resolve_inputs};
