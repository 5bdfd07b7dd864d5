//! Validators over generated schema artifacts.

pub mod agreement;
pub mod json_schema;
pub mod xsd;
