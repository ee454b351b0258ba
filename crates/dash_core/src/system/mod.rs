pub mod fall_death;
pub mod patrol;
