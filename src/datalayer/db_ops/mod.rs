pub mod builder;
pub mod constants;
pub mod db_ops;

pub use constants::DbConfig;
pub use db_ops::{
    DatabaseHealth, DbManager, initialize_database, initialize_database_with_config,
};
