//! Parses `.enbu.yaml` flow documents into the typed command model and
//! expands `${VAR}` references against a merged environment (§4.3,
//! §4.4).

pub mod expander;
pub mod flow_parser;
pub mod line_index;
pub mod schema;

pub use expander::expand_flow;
pub use flow_parser::{parse_flow_document, ParsedFlow};
