pub mod cities;
pub mod points_of_interest;
