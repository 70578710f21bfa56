//! Foreign keys enforced, violations returned from `main` unmodified.

use library_store::{DEFAULT_DATABASE_PATH, Profile, init_tracing, run};

#[tokio::main]
async fn main() -> library_store::Result<()> {
   let config = Profile::Unhandled.config(DEFAULT_DATABASE_PATH);
   init_tracing(&config);

   run(config).await?;
   Ok(())
}
