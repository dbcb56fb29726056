//! Line scoring.
//!
//! A record is scored in four steps:
//! - every configured text field is tokenized ([`crate::analyzer`])
//! - keyword hits add the rule weight ([`keyword`])
//! - suffixes near each hit add their own weight ([`proximity`])
//! - the field sum is multiplied by one domain factor ([`domain`])
//!
//! [`LineScorer`] ties the steps together and decides retention.

pub mod domain;
pub mod keyword;
mod line;
pub mod proximity;

pub use domain::{extract_host, DomainMultiplier};
pub use keyword::{locate_keywords, Positions};
pub use line::LineScorer;
pub use proximity::{proximity_weight, window};
