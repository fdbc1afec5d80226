pub mod error;
pub mod output;
pub mod resolver;
pub mod settings;
pub mod shift;
pub mod stops;
pub mod timetable;
