// SQL builders, one module per table plus DDL
pub mod ddl;
pub mod media;
pub mod places;
pub mod segments;
