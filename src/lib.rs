//! In-memory genealogy: a directed acyclic graph of payloads below one stem.
//!
//! Nodes may have several parents and several children. Creation, edge
//! connection and cascading removal either succeed completely or leave the
//! genealogy untouched.
//!
//! ```
//! use genealogy::util::testing::Virus;
//! use genealogy::Genealogy;
//!
//! let mut gen: Genealogy<Virus> = Genealogy::new("1".to_string()).unwrap();
//! gen.create("2".to_string(), &"1".to_string()).unwrap();
//! gen.create("3".to_string(), &"1".to_string()).unwrap();
//! gen.create_with_parents("4".to_string(), &["2".to_string(), "3".to_string()]).unwrap();
//!
//! gen.remove(&"2".to_string()).unwrap();
//! assert!(gen.exists(&"4".to_string()));
//! assert_eq!(gen.parents(&"4".to_string()).unwrap().len(), 1);
//! ```

pub mod children;
pub mod config;
pub mod domain;
pub mod errors;
pub mod genealogy;
pub mod mutation;
pub mod tree_traits;
pub mod util;

pub use children::Children;
pub use config::{EmptyParentsPolicy, Settings};
pub use domain::{BoxError, GenealogyError, GenealogyResult, Payload};
pub use errors::{SettingsError, SettingsResult};
pub use genealogy::Genealogy;
