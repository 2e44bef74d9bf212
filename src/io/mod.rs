pub mod export;
pub mod gff;
