pub mod criteria;
pub mod evidence;
pub mod retrieve;
