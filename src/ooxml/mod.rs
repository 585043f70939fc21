//! Office Open XML (OOXML) binary spreadsheet support.
//!
//! Only the binary workbook format (`xlsb`) is implemented. Unpacking the ZIP
//! container and reading its relationship parts are left to the caller, who
//! hands the extracted parts to [`xlsb::XlsbPackage`] (or any
//! [`xlsb::PartProvider`]).
pub mod xlsb;
