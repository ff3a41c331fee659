mod grounded;
mod retrieve;
mod web_fallback;

pub use grounded::{GroundedAnswerNode, EMPTY_CONTEXT_REPLY, INSUFFICIENT_CONTEXT_MARKER};
pub use retrieve::RetrieveNode;
pub use web_fallback::{WebFallbackNode, WEB_SOURCE_DISCLOSURE};
