use wave_http::WaveClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = WaveClient::from_env()?;

    let health = client.health().await?;
    println!("backend is {}", health.status);

    let version = client.version().await?;
    println!(
        "api {} / client {} ({})",
        version.api_version,
        client.client_version(),
        version.compatibility_rule
    );

    let experiments = client.experiments().by_tags(["pilot"]).await?;
    for experiment in experiments {
        println!("{}  {}", experiment.uuid, experiment.description);
    }

    Ok(())
}
