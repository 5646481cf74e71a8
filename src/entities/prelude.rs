pub use super::match_goals::Entity as MatchGoals;
pub use super::matches::Entity as Matches;
pub use super::players::Entity as Players;
pub use super::team_ratings::Entity as TeamRatings;
pub use super::teams::Entity as Teams;
pub use super::users::Entity as Users;
