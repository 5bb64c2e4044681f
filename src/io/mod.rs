pub mod tsplib_reader;
pub use tsplib_reader::*;
pub mod tsplib_writer;
pub use tsplib_writer::TsplibWriter;

pub mod dataset_list;
pub use dataset_list::*;
pub mod result_writer;
pub use result_writer::*;
