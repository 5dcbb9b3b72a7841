pub mod chord;
pub mod melody;
pub mod note;
