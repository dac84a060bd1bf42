#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cmcd2timestream_lambda::run().await
}
