//! Foreign keys off and every statement logged; the insert always succeeds.

use library_store::{DEFAULT_DATABASE_PATH, Profile, init_tracing, run};
use tracing::info;

#[tokio::main]
async fn main() -> library_store::Result<()> {
   let config = Profile::Unenforced.config(DEFAULT_DATABASE_PATH);
   init_tracing(&config);

   let book = run(config).await?;
   info!(
      "Inserted book {} ({}) for author {}",
      book.id, book.title, book.author_id
   );
   Ok(())
}
