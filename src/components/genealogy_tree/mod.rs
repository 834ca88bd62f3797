mod component;
mod export;
mod render;
mod state;

pub use component::GenealogyCanvas;
pub use export::export_file_name;
