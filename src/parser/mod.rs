// Portal Inmobiliario page parsing: locating listing fragments in markup.

pub mod portal_parser;

pub use portal_parser::{Parser, PortalParser};
