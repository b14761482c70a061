pub mod fs_component_tree;
