pub mod controls;
pub mod detail_panel;
pub mod genealogy_tree;
