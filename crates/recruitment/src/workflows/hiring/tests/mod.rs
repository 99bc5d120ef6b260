mod common;
mod openings;
mod routing;
