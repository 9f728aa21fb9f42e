pub mod overviews;
pub mod quotes;
