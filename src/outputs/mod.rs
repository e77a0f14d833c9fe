//! Output generation for scraped records.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── HEYZO/
//! │   └── 1234.json
//! └── xslist/
//!     ├── 5589.json
//!     └── search-jane-doe.json
//! ```

pub mod json;
