//! Entity to model mappers
//!
//! - `From<Model> for Entity`: convert stored records to domain objects
//! - `From<&Entity> for Model`: prepare entity data for writing

mod ban;
mod soft_ban;
