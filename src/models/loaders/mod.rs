pub mod identifier_loader;

pub use identifier_loader::{collect_identifiers_text, load_identifiers_text};
