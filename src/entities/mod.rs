// Entity Models - Business centers and the companies they house
//
// Each entity has:
// - A raw, all-optional shape as it arrives from the bundled dataset
// - A validated shape that every filter and aggregate works on
// - Validation errors that name the record and field at fault

pub mod business_center;
pub mod company;
pub mod validation;

pub use business_center::{BusinessCenter, RawBusinessCenter};
pub use company::{Company, RawCompany};
pub use validation::ValidationError;
