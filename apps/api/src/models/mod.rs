pub mod institution;
