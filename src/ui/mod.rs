/// Widget builders for the three screens
pub mod views;
