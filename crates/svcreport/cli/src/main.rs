//! svcreport - IT service availability report

#[tokio::main]
async fn main() -> svcreport_cli::CliResult<()> {
    svcreport_cli::run().await
}
