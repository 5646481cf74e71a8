pub mod prelude;

pub mod match_goals;
pub mod matches;
pub mod players;
pub mod team_ratings;
pub mod teams;
pub mod users;
