//! Integration tests
//!
//! End-to-end wizard runs against in-memory fake gateways, plus spreadsheet
//! verification by reading the produced workbook back.

mod fakes;
mod excel_test;
mod wizard_test;
