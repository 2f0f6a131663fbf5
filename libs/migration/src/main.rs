//! `cargo run -p migration -- up` applies the catalog schema using
//! DATABASE_URL; `down`, `status` and `fresh` are also available.

#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(migration::Migrator).await;
}
