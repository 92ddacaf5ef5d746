use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    leaf_lens_lib::run().await
}
