pub mod naming;
pub mod types;

pub use naming::{SUFFIX_LEN, deployment_name, random_suffix};
pub use types::*;
