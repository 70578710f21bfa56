//! Foreign keys enforced, violations rewritten and printed to stdout.

use std::process::ExitCode;

use library_store::{DEFAULT_DATABASE_PATH, Profile, init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
   let config = Profile::Sanitized.config(DEFAULT_DATABASE_PATH);
   init_tracing(&config);

   match run(config).await {
      Ok(_) => ExitCode::SUCCESS,
      Err(err) => {
         println!("{err}");
         ExitCode::FAILURE
      }
   }
}
