//! Vault output primitives: names, headers, layout and links.

pub mod frontmatter;
pub mod layout;
pub mod links;
pub mod sanitize;

pub use frontmatter::{Frontmatter, FrontmatterFormat, parse_literal, read_document, to_literal};
pub use layout::VaultLayout;
pub use links::LinkIndex;
pub use sanitize::sanitize_name;
