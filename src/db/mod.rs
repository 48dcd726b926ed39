pub mod postgres;
pub mod store;

pub use postgres::PgLeagueStore;
pub use store::LeagueStore;
