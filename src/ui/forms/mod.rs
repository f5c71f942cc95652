//! Questionnaire form rendering

mod field_renderer;
mod section_form;

pub use section_form::draw_section;
