pub mod output_record;
pub mod product_row;
