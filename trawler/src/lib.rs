pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{
    build_scan_options, load_ignore_list, load_parameter_file, parse_extension_list,
    parse_header, render_summary,
};
