/// Pool setup, migrations and default data
pub mod connection;
/// Table models and their queries
pub mod models;
