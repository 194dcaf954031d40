pub mod domain;
pub mod preview;

pub use domain::{domain_label, registrable_domain, DomainParts};
pub use preview::{preview_compact, preview_url};
